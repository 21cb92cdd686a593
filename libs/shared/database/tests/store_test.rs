use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_database::StoreClient;

fn test_config(url: &str) -> AppConfig {
    AppConfig {
        store_url: url.to_string(),
        store_anon_key: "test-anon-key".to_string(),
        store_jwt_secret: "test-secret".to_string(),
    }
}

#[tokio::test]
async fn insert_many_posts_the_whole_batch_as_one_array() {
    let mock_server = MockServer::start().await;

    let batch = vec![json!({ "name": "a" }), json!({ "name": "b" })];

    Mock::given(method("POST"))
        .and(path("/rest/v1/things"))
        .and(header("Prefer", "return=representation"))
        .and(header("apikey", "test-anon-key"))
        .and(body_json(json!([{ "name": "a" }, { "name": "b" }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "id": 1, "name": "a" },
            { "id": 2, "name": "b" },
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = StoreClient::new(&test_config(&mock_server.uri()));
    let created = store.insert_many("things", batch, None).await.unwrap();

    assert_eq!(created.len(), 2);
    assert_eq!(created[1]["name"], "b");
}

#[tokio::test]
async fn bearer_token_is_forwarded_when_present() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/things"))
        .and(header("Authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = StoreClient::new(&test_config(&mock_server.uri()));
    let result: Vec<Value> = store
        .select("things", "id=eq.1", Some("user-token"))
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn patch_returning_yields_empty_when_the_filter_misses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/things"))
        .and(query_param("id", "eq.42"))
        .and(query_param("version", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let store = StoreClient::new(&test_config(&mock_server.uri()));
    let result = store
        .patch_returning("things", "id=eq.42&version=eq.7", json!({ "status": "X" }), None)
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn delete_succeeds_on_a_bodyless_no_content_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/things"))
        .and(query_param("id", "eq.1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = StoreClient::new(&test_config(&mock_server.uri()));
    let result = store.delete("things", "id=eq.1", None).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn delete_surfaces_store_rejections() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/things"))
        .respond_with(ResponseTemplate::new(403).set_body_string("row-level security"))
        .mount(&mock_server)
        .await;

    let store = StoreClient::new(&test_config(&mock_server.uri()));
    let result = store.delete("things", "id=eq.1", None).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn server_errors_surface_as_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/things"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let store = StoreClient::new(&test_config(&mock_server.uri()));
    let result = store.select("things", "id=eq.1", None).await;

    assert!(result.is_err());
}
