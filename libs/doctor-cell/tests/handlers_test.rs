use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::handlers::*;
use doctor_cell::models::*;
use shared_models::{auth::User, error::AppError};
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn create_user_extension(test_user: &TestUser) -> Extension<User> {
    Extension(test_user.to_user())
}

fn create_auth_header(token: &str) -> TypedHeader<Authorization<Bearer>> {
    TypedHeader(Authorization::bearer(token).unwrap())
}

fn hospital_record(hospital_id: Uuid, owner_id: &str) -> Value {
    json!({
        "id": hospital_id,
        "owner_id": owner_id,
        "name": "City General",
        "email": "admin@citygeneral.example.com",
        "phone": "+911234567890",
        "address": null,
        "city": null,
        "state": null,
        "pincode": null,
        "license_number": null,
        "is_verified": true,
        "profile_completed": false,
        "created_at": Utc::now().to_rfc3339(),
        "updated_at": Utc::now().to_rfc3339()
    })
}

fn doctor_record(doctor_id: Uuid, hospital_id: Uuid, email: &str, duration: i32) -> Value {
    json!({
        "id": doctor_id,
        "hospital_id": hospital_id,
        "department_id": null,
        "name": "Dr. Rao",
        "email": email,
        "phone": "+919876543210",
        "specialization": "Cardiology",
        "consultation_duration": duration,
        "profile_image_url": null,
        "created_at": Utc::now().to_rfc3339(),
        "updated_at": Utc::now().to_rfc3339()
    })
}

async fn mount_hospital_lookup(server: &MockServer, hospital_id: Uuid, owner_id: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/hospitals"))
        .and(query_param("owner_id", format!("eq.{}", owner_id)))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([hospital_record(hospital_id, owner_id)])))
        .mount(server)
        .await;
}

fn create_request(duration: i32) -> CreateDoctorRequest {
    CreateDoctorRequest {
        name: "Dr. Rao".to_string(),
        email: "rao@citygeneral.example.com".to_string(),
        phone: "+919876543210".to_string(),
        specialization: "Cardiology".to_string(),
        department_id: None,
        consultation_duration: duration,
        profile_image_url: None,
    }
}

#[tokio::test]
async fn test_get_doctor_public() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([doctor_record(doctor_id, Uuid::new_v4(), "rao@example.com", 20)])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri()).to_arc();
    let result = get_doctor_public(State(config), Path(doctor_id.to_string())).await;

    let Json(body) = result.expect("lookup should succeed");
    assert_eq!(body["id"], json!(doctor_id));
    assert_eq!(body["consultation_duration"], 20);
}

#[tokio::test]
async fn test_list_doctors_public() {
    let mock_server = MockServer::start().await;
    let hospital_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("hospital_id", format!("eq.{}", hospital_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_record(Uuid::new_v4(), hospital_id, "rao@example.com", 20),
            doctor_record(Uuid::new_v4(), hospital_id, "iyer@example.com", 30),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri()).to_arc();
    let result = list_doctors_public(
        State(config),
        Query(DoctorListQuery { hospital_id: hospital_id.to_string() }),
    ).await;

    let Json(body) = result.expect("listing should succeed");
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_create_doctor_success() {
    let mock_server = MockServer::start().await;
    let test_user = TestUser::hospital("citygeneral@example.com");
    let hospital_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    mount_hospital_lookup(&mock_server, hospital_id, &test_user.id).await;

    // No doctor with this email yet
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("email", "eq.rao@citygeneral.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            doctor_record(doctor_id, hospital_id, "rao@citygeneral.example.com", 20),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri());
    let token = JwtTestUtils::create_test_token(&test_user, &config.jwt_secret, Some(1));

    let result = create_doctor(
        State(config.to_arc()),
        create_auth_header(&token),
        create_user_extension(&test_user),
        Json(create_request(20)),
    ).await;

    let Json(body) = result.expect("creation should succeed");
    assert_eq!(body["hospital_id"], json!(hospital_id));
    assert_eq!(body["consultation_duration"], 20);
}

#[tokio::test]
async fn test_create_doctor_rejects_non_positive_duration() {
    let mock_server = MockServer::start().await;
    let test_user = TestUser::hospital("citygeneral@example.com");
    let hospital_id = Uuid::new_v4();

    mount_hospital_lookup(&mock_server, hospital_id, &test_user.id).await;

    let config = TestConfig::with_store_url(&mock_server.uri());
    let token = JwtTestUtils::create_test_token(&test_user, &config.jwt_secret, Some(1));

    for duration in [0, -15] {
        let result = create_doctor(
            State(config.to_arc()),
            create_auth_header(&token),
            create_user_extension(&test_user),
            Json(create_request(duration)),
        ).await;

        assert!(
            matches!(result, Err(AppError::BadRequest(_))),
            "duration {} should be rejected", duration
        );
    }
}

#[tokio::test]
async fn test_create_doctor_duplicate_email_rejected() {
    let mock_server = MockServer::start().await;
    let test_user = TestUser::hospital("citygeneral@example.com");
    let hospital_id = Uuid::new_v4();

    mount_hospital_lookup(&mock_server, hospital_id, &test_user.id).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("email", "eq.rao@citygeneral.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_record(Uuid::new_v4(), hospital_id, "rao@citygeneral.example.com", 20),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri());
    let token = JwtTestUtils::create_test_token(&test_user, &config.jwt_secret, Some(1));

    let result = create_doctor(
        State(config.to_arc()),
        create_auth_header(&token),
        create_user_extension(&test_user),
        Json(create_request(20)),
    ).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_update_doctor_of_other_hospital_rejected() {
    let mock_server = MockServer::start().await;
    let test_user = TestUser::hospital("citygeneral@example.com");
    let hospital_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    mount_hospital_lookup(&mock_server, hospital_id, &test_user.id).await;

    // Doctor exists under a different hospital
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_record(doctor_id, Uuid::new_v4(), "rao@example.com", 20),
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri());
    let token = JwtTestUtils::create_test_token(&test_user, &config.jwt_secret, Some(1));

    let result = update_doctor(
        State(config.to_arc()),
        create_auth_header(&token),
        create_user_extension(&test_user),
        Path(doctor_id.to_string()),
        Json(UpdateDoctorRequest {
            name: Some("Dr. Rao Jr.".to_string()),
            email: None,
            phone: None,
            specialization: None,
            department_id: None,
            consultation_duration: None,
            profile_image_url: None,
        }),
    ).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_delete_doctor_success() {
    let mock_server = MockServer::start().await;
    let test_user = TestUser::hospital("citygeneral@example.com");
    let hospital_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    mount_hospital_lookup(&mock_server, hospital_id, &test_user.id).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_record(doctor_id, hospital_id, "rao@example.com", 20),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri());
    let token = JwtTestUtils::create_test_token(&test_user, &config.jwt_secret, Some(1));

    let result = delete_doctor(
        State(config.to_arc()),
        create_auth_header(&token),
        create_user_extension(&test_user),
        Path(doctor_id.to_string()),
    ).await;

    let Json(body) = result.expect("deletion should succeed");
    assert_eq!(body["deleted"], true);
}
