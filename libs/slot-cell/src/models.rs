use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    #[serde(rename = "AVAILABLE")]
    Available,
    #[serde(rename = "BOOKED")]
    Booked,
    #[serde(rename = "BLOCKED")]
    Blocked,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Available => write!(f, "AVAILABLE"),
            SlotStatus::Booked => write!(f, "BOOKED"),
            SlotStatus::Blocked => write!(f, "BLOCKED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentType {
    #[serde(rename = "In-person")]
    InPerson,
    #[serde(rename = "Video")]
    Video,
}

/// One bookable appointment interval for one doctor on one date.
///
/// Wall-clock times are hospital-local `"HH:MM"` strings; all comparisons go
/// through the minute arithmetic in `services::timecalc`. Identity and the
/// interval itself are immutable after creation - only `status`, the booking
/// metadata, and `version` ever change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub hospital_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: SlotStatus,
    /// Bumped on every status transition; transition writes are filtered on
    /// the caller-observed value so a lost update surfaces as a conflict.
    pub version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<AppointmentType>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSlotsRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// The slot version the caller last observed.
    pub version: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub version: i64,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub appointment_type: AppointmentType,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SlotError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Slot cannot move from {from} to {to}")]
    IllegalTransition { from: SlotStatus, to: SlotStatus },

    #[error("A booked slot cannot be deleted")]
    DeleteBooked,

    #[error("Requested window overlaps existing slots for this doctor and date")]
    OverlappingWindow,

    #[error("Slot was modified by another session")]
    VersionConflict,

    #[error("Slot not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Slot belongs to a different hospital")]
    Unauthorized,

    #[error("Store error: {0}")]
    StoreError(String),
}

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::InvalidParameter(msg) => AppError::ValidationError(msg),
            SlotError::IllegalTransition { .. } | SlotError::DeleteBooked => {
                AppError::IllegalTransition(err.to_string())
            }
            SlotError::OverlappingWindow | SlotError::VersionConflict => {
                AppError::Conflict(err.to_string())
            }
            SlotError::NotFound => AppError::NotFound("Slot not found".to_string()),
            SlotError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
            SlotError::Unauthorized => AppError::Auth(err.to_string()),
            SlotError::StoreError(msg) => AppError::Persistence(msg),
        }
    }
}
