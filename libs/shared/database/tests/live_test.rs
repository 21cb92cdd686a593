use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_database::{LiveQuery, StoreClient};

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct SlotRow {
    id: String,
    status: String,
}

fn test_config(url: &str) -> AppConfig {
    AppConfig {
        store_url: url.to_string(),
        store_anon_key: "test-anon-key".to_string(),
        store_jwt_secret: "test-secret".to_string(),
    }
}

#[tokio::test]
async fn open_seeds_the_channel_with_the_current_set() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/time_slots"))
        .and(query_param("doctor_id", "eq.doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "slot-1", "status": "AVAILABLE" },
            { "id": "slot-2", "status": "BOOKED" },
        ])))
        .mount(&mock_server)
        .await;

    let store = Arc::new(StoreClient::new(&test_config(&mock_server.uri())));
    let live: LiveQuery<SlotRow> =
        LiveQuery::open(store, "time_slots", "doctor_id", "doc-1", None)
            .await
            .expect("initial fetch should succeed");

    let current = live.current();
    assert_eq!(current.len(), 2);
    assert_eq!(current[0].id, "slot-1");
}

#[tokio::test]
async fn refresh_publishes_to_subscribers() {
    let mock_server = MockServer::start().await;

    // First response seeds the channel, second arrives on refresh
    Mock::given(method("GET"))
        .and(path("/rest/v1/time_slots"))
        .and(query_param("doctor_id", "eq.doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "slot-1", "status": "AVAILABLE" },
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/time_slots"))
        .and(query_param("doctor_id", "eq.doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "slot-1", "status": "BOOKED" },
        ])))
        .mount(&mock_server)
        .await;

    let store = Arc::new(StoreClient::new(&test_config(&mock_server.uri())));
    let live: LiveQuery<SlotRow> =
        LiveQuery::open(store, "time_slots", "doctor_id", "doc-1", None)
            .await
            .expect("initial fetch should succeed");

    let mut rx = live.subscribe();
    assert_eq!(rx.borrow().first().unwrap().status, "AVAILABLE");

    live.refresh(None).await.expect("refresh should succeed");

    rx.changed().await.expect("sender is still alive");
    assert_eq!(rx.borrow().first().unwrap().status, "BOOKED");
}

#[tokio::test]
async fn open_fails_when_the_store_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/time_slots"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let store = Arc::new(StoreClient::new(&test_config(&mock_server.uri())));
    let result: anyhow::Result<LiveQuery<SlotRow>> =
        LiveQuery::open(store, "time_slots", "doctor_id", "doc-1", None).await;

    assert!(result.is_err());
}
