use anyhow::{Result, anyhow};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::StoreClient;

use crate::models::{Hospital, RegisterHospitalRequest, UpdateHospitalProfileRequest};

pub struct HospitalService {
    store: StoreClient,
}

impl HospitalService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Register a hospital account for the authenticated user. One hospital
    /// per owner; a second registration is rejected.
    pub async fn register_hospital(
        &self,
        owner_id: &str,
        request: RegisterHospitalRequest,
        auth_token: &str,
    ) -> Result<Hospital> {
        debug!("Registering hospital for owner: {}", owner_id);

        let existing = self.store
            .select_by_field("hospitals", "owner_id", owner_id, Some(auth_token))
            .await?;

        if !existing.is_empty() {
            return Err(anyhow!("A hospital is already registered for this account"));
        }

        let hospital_data = json!({
            "owner_id": owner_id,
            "name": request.name,
            "email": request.email,
            "phone": request.phone,
            "is_verified": false,
            "profile_completed": false,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let created = self.store
            .insert_returning("hospitals", hospital_data, Some(auth_token))
            .await?;

        let hospital: Hospital = serde_json::from_value(created)?;
        debug!("Hospital registered with ID: {}", hospital.id);

        Ok(hospital)
    }

    /// Resolve the hospital owned by an authenticated user. Other cells use
    /// this for ownership checks on doctors and slots.
    pub async fn get_by_owner(
        &self,
        owner_id: &str,
        auth_token: &str,
    ) -> Result<Hospital> {
        let result = self.store
            .select_by_field("hospitals", "owner_id", owner_id, Some(auth_token))
            .await?;

        let record = result.into_iter().next()
            .ok_or_else(|| anyhow!("No hospital registered for this account"))?;

        let hospital: Hospital = serde_json::from_value(record)?;
        Ok(hospital)
    }

    pub async fn get_hospital_public(&self, hospital_id: &str) -> Result<Hospital> {
        debug!("Fetching public hospital profile: {}", hospital_id);

        let result = self.store
            .select_by_field("hospitals", "id", hospital_id, None)
            .await?;

        let record = result.into_iter().next()
            .ok_or_else(|| anyhow!("Hospital not found"))?;

        let hospital: Hospital = serde_json::from_value(record)?;
        Ok(hospital)
    }

    /// Update the profile fields, recomputing `profile_completed` from the
    /// resulting record. Verification status is never touched here.
    pub async fn update_profile(
        &self,
        owner_id: &str,
        request: UpdateHospitalProfileRequest,
        auth_token: &str,
    ) -> Result<Hospital> {
        let current = self.get_by_owner(owner_id, auth_token).await?;
        debug!("Updating hospital profile: {}", current.id);

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(address));
        }
        if let Some(city) = request.city {
            update_data.insert("city".to_string(), json!(city));
        }
        if let Some(state) = request.state {
            update_data.insert("state".to_string(), json!(state));
        }
        if let Some(pincode) = request.pincode {
            update_data.insert("pincode".to_string(), json!(pincode));
        }
        if let Some(license_number) = request.license_number {
            update_data.insert("license_number".to_string(), json!(license_number));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let filter = format!("id=eq.{}", current.id);
        let result: Vec<Value> = self.store
            .patch_returning("hospitals", &filter, Value::Object(update_data), Some(auth_token))
            .await?;

        let record = result.into_iter().next()
            .ok_or_else(|| anyhow!("Failed to update hospital profile"))?;

        let mut hospital: Hospital = serde_json::from_value(record)?;

        // profile_completed follows from the stored fields, not the request
        let completed = hospital.has_complete_profile();
        if completed != hospital.profile_completed {
            let result: Vec<Value> = self.store
                .patch_returning(
                    "hospitals",
                    &filter,
                    json!({ "profile_completed": completed }),
                    Some(auth_token),
                )
                .await?;

            if let Some(record) = result.into_iter().next() {
                hospital = serde_json::from_value(record)?;
            }
        }

        Ok(hospital)
    }
}
