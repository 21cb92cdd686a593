use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};

use hospital_cell::services::hospital::HospitalService;
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, UpdateDoctorRequest};
use crate::services::doctor::DoctorService;

#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    pub hospital_id: String,
}

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn get_doctor_public(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor_public(&doctor_id).await
        .map_err(|_| AppError::NotFound("Doctor not found".to_string()))?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn list_doctors_public(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors_public(&query.hospital_id).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

// ==============================================================================
// PROTECTED DOCTOR MANAGEMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.create_doctor(hospital.id, request, token).await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<String>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.update_doctor(hospital.id, &doctor_id, request, token).await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let doctor_service = DoctorService::new(&state);
    doctor_service.delete_doctor(hospital.id, &doctor_id, token).await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(json!({ "deleted": true })))
}
