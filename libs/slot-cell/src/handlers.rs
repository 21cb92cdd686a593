use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use hospital_cell::services::hospital::HospitalService;
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{BookSlotRequest, GenerateSlotsRequest, SlotStatus, TransitionRequest};
use crate::services::slots::SlotService;

#[derive(Debug, Deserialize)]
pub struct SlotListQuery {
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub status: Option<SlotStatus>,
}

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_slots_public(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SlotListQuery>,
) -> Result<Json<Value>, AppError> {
    let slot_service = SlotService::new(&state);

    let slots = slot_service
        .list_slots(query.doctor_id, query.date, query.status, None)
        .await?;

    Ok(Json(json!({
        "slots": slots,
        "total": slots.len()
    })))
}

// ==============================================================================
// PROTECTED SLOT MANAGEMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn generate_slots(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<GenerateSlotsRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let slot_service = SlotService::new(&state);
    let slots = slot_service.generate_slots(hospital.id, request, token).await?;

    Ok(Json(json!({
        "created": slots.len(),
        "slots": slots
    })))
}

#[axum::debug_handler]
pub async fn block_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(slot_id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let slot_service = SlotService::new(&state);
    let slot = slot_service
        .block_slot(hospital.id, &slot_id, request.version, token)
        .await?;

    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn unblock_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(slot_id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let slot_service = SlotService::new(&state);
    let slot = slot_service
        .unblock_slot(hospital.id, &slot_id, request.version, token)
        .await?;

    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(slot_id): Path<String>,
    Json(request): Json<BookSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let slot_service = SlotService::new(&state);
    let slot = slot_service
        .book_slot(hospital.id, &slot_id, &user.id, &request, token)
        .await?;

    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(slot_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let hospital_service = HospitalService::new(&state);
    let hospital = hospital_service.get_by_owner(&user.id, token).await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let slot_service = SlotService::new(&state);
    slot_service.delete_slot(hospital.id, &slot_id, token).await?;

    Ok(Json(json!({ "deleted": true })))
}
