use anyhow::{Result, anyhow};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::StoreClient;

use crate::models::{CreateDoctorRequest, Doctor, UpdateDoctorRequest};

pub struct DoctorService {
    store: StoreClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Create a doctor under the given hospital.
    pub async fn create_doctor(
        &self,
        hospital_id: Uuid,
        request: CreateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor> {
        debug!("Creating doctor profile for: {}", request.email);

        if request.consultation_duration <= 0 {
            return Err(anyhow!("Consultation duration must be a positive number of minutes"));
        }

        let existing = self.store
            .select(
                "doctors",
                &format!("hospital_id=eq.{}&email=eq.{}", hospital_id, request.email),
                Some(auth_token),
            )
            .await?;

        if !existing.is_empty() {
            return Err(anyhow!("Doctor with email {} already exists", request.email));
        }

        let doctor_data = json!({
            "hospital_id": hospital_id,
            "department_id": request.department_id,
            "name": request.name,
            "email": request.email,
            "phone": request.phone,
            "specialization": request.specialization,
            "consultation_duration": request.consultation_duration,
            "profile_image_url": request.profile_image_url,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let created = self.store
            .insert_returning("doctors", doctor_data, Some(auth_token))
            .await?;

        let doctor: Doctor = serde_json::from_value(created)?;
        debug!("Doctor profile created with ID: {}", doctor.id);

        Ok(doctor)
    }

    pub async fn get_doctor_public(&self, doctor_id: &str) -> Result<Doctor> {
        debug!("Fetching doctor profile: {}", doctor_id);

        let result = self.store
            .select_by_field("doctors", "id", doctor_id, None)
            .await?;

        let record = result.into_iter().next()
            .ok_or_else(|| anyhow!("Doctor not found"))?;

        let doctor: Doctor = serde_json::from_value(record)?;
        Ok(doctor)
    }

    pub async fn list_doctors_public(&self, hospital_id: &str) -> Result<Vec<Doctor>> {
        let filter = format!("hospital_id=eq.{}&order=name.asc", hospital_id);
        let result = self.store.select("doctors", &filter, None).await?;

        let doctors: Vec<Doctor> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Doctor>, _>>()?;

        Ok(doctors)
    }

    /// Update a doctor profile. Slots generated under the previous
    /// consultation duration are left exactly as they were.
    pub async fn update_doctor(
        &self,
        hospital_id: Uuid,
        doctor_id: &str,
        request: UpdateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor> {
        debug!("Updating doctor profile: {}", doctor_id);

        self.get_owned_doctor(hospital_id, doctor_id, auth_token).await?;

        if let Some(duration) = request.consultation_duration {
            if duration <= 0 {
                return Err(anyhow!("Consultation duration must be a positive number of minutes"));
            }
        }

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(specialization) = request.specialization {
            update_data.insert("specialization".to_string(), json!(specialization));
        }
        if let Some(department_id) = request.department_id {
            update_data.insert("department_id".to_string(), json!(department_id));
        }
        if let Some(duration) = request.consultation_duration {
            update_data.insert("consultation_duration".to_string(), json!(duration));
        }
        if let Some(image) = request.profile_image_url {
            update_data.insert("profile_image_url".to_string(), json!(image));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let filter = format!("id=eq.{}", doctor_id);
        let result: Vec<Value> = self.store
            .patch_returning("doctors", &filter, Value::Object(update_data), Some(auth_token))
            .await?;

        let record = result.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to update doctor profile"))?;

        let doctor: Doctor = serde_json::from_value(record)?;
        Ok(doctor)
    }

    pub async fn delete_doctor(
        &self,
        hospital_id: Uuid,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<()> {
        debug!("Deleting doctor: {}", doctor_id);

        self.get_owned_doctor(hospital_id, doctor_id, auth_token).await?;

        let filter = format!("id=eq.{}", doctor_id);
        self.store.delete("doctors", &filter, Some(auth_token)).await?;

        Ok(())
    }

    /// Fetch a doctor and verify it belongs to the caller's hospital.
    pub async fn get_owned_doctor(
        &self,
        hospital_id: Uuid,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<Doctor> {
        let result = self.store
            .select_by_field("doctors", "id", doctor_id, Some(auth_token))
            .await?;

        let record = result.into_iter().next()
            .ok_or_else(|| anyhow!("Doctor not found"))?;

        let doctor: Doctor = serde_json::from_value(record)?;

        if doctor.hospital_id != hospital_id {
            return Err(anyhow!("Doctor belongs to a different hospital"));
        }

        Ok(doctor)
    }
}
