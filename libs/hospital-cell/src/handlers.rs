use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    CreateDepartmentRequest, RegisterHospitalRequest,
    UpdateDepartmentRequest, UpdateHospitalProfileRequest,
};
use crate::services::{department::DepartmentService, hospital::HospitalService};

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn get_hospital_public(
    State(state): State<Arc<AppConfig>>,
    Path(hospital_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let hospital_service = HospitalService::new(&state);

    let hospital = hospital_service.get_hospital_public(&hospital_id).await
        .map_err(|_| AppError::NotFound("Hospital not found".to_string()))?;

    Ok(Json(json!(hospital)))
}

// ==============================================================================
// PROTECTED HOSPITAL PROFILE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn register_hospital(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<RegisterHospitalRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);

    let hospital = hospital_service.register_hospital(&user.id, request, token).await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(json!(hospital)))
}

#[axum::debug_handler]
pub async fn get_own_hospital(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);

    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!(hospital)))
}

#[axum::debug_handler]
pub async fn update_hospital_profile(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateHospitalProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);

    let hospital = hospital_service.update_profile(&user.id, request, token).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(hospital)))
}

// ==============================================================================
// DEPARTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_department(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let department_service = DepartmentService::new(&state);
    let department = department_service.create_department(hospital.id, request, token).await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(json!(department)))
}

#[axum::debug_handler]
pub async fn list_departments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let department_service = DepartmentService::new(&state);
    let departments = department_service.list_departments(hospital.id, token).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "departments": departments,
        "total": departments.len()
    })))
}

#[axum::debug_handler]
pub async fn update_department(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(department_id): Path<String>,
    Json(request): Json<UpdateDepartmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let department_service = DepartmentService::new(&state);
    let department = department_service
        .update_department(hospital.id, &department_id, request, token).await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(json!(department)))
}

#[axum::debug_handler]
pub async fn delete_department(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(department_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let department_service = DepartmentService::new(&state);
    department_service.delete_department(hospital.id, &department_id, token).await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(json!({ "deleted": true })))
}
