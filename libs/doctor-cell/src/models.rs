use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub department_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    /// Length of one appointment in minutes. Parameterizes slot generation;
    /// changing it never rewrites slots that already exist.
    pub consultation_duration: i32,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub department_id: Option<Uuid>,
    pub consultation_duration: i32,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub department_id: Option<Uuid>,
    pub consultation_duration: Option<i32>,
    pub profile_image_url: Option<String>,
}
