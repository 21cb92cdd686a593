use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use shared_config::AppConfig;
use shared_database::StoreClient;

use crate::models::{
    BookSlotRequest, GenerateSlotsRequest, SlotError, SlotStatus, TimeSlot,
};
use crate::services::generator::SlotGenerator;
use crate::services::lifecycle::SlotLifecycle;
use crate::services::timecalc::to_minutes;

const SLOTS: &str = "time_slots";

/// Persistence and transition logic for time slots.
///
/// Slots are only ever created in bulk by generation; afterwards they change
/// through status transitions and explicit deletion. Every transition write
/// is guarded by the caller-observed version.
pub struct SlotService {
    store: StoreClient,
}

impl SlotService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Generate and persist the slot batch for one doctor/date/window.
    ///
    /// The whole batch goes to the store as one atomic insert; a window that
    /// would overlap slots already on the books is rejected outright rather
    /// than silently producing duplicates.
    pub async fn generate_slots(
        &self,
        hospital_id: Uuid,
        request: GenerateSlotsRequest,
        auth_token: &str,
    ) -> Result<Vec<TimeSlot>, SlotError> {
        let doctor = self.get_owned_doctor(hospital_id, request.doctor_id, auth_token).await?;

        let slots = SlotGenerator::generate(
            doctor.id,
            hospital_id,
            request.date,
            &request.start_time,
            &request.end_time,
            doctor.consultation_duration,
        )?;

        if slots.is_empty() {
            debug!("Window {} - {} produced no slots", request.start_time, request.end_time);
            return Ok(vec![]);
        }

        // Overlap is checked against the emitted coverage, not the raw
        // request window - a dropped tail cannot conflict.
        let coverage_start = to_minutes(&slots[0].start_time)?;
        let coverage_end = to_minutes(&slots[slots.len() - 1].end_time)?;
        self.check_window_is_free(
            request.doctor_id,
            request.date,
            coverage_start,
            coverage_end,
            auth_token,
        ).await?;

        let records = slots.iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        let created = self.store
            .insert_many(SLOTS, records, Some(auth_token))
            .await
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        let persisted = parse_slots(created)?;

        info!(
            "Created {} slots for doctor {} on {}",
            persisted.len(), request.doctor_id, request.date
        );

        Ok(persisted)
    }

    /// Query slots by any combination of doctor, date and status, ordered by
    /// start time. Zero-padded HH:MM strings sort chronologically.
    pub async fn list_slots(
        &self,
        doctor_id: Option<Uuid>,
        date: Option<NaiveDate>,
        status: Option<SlotStatus>,
        auth_token: Option<&str>,
    ) -> Result<Vec<TimeSlot>, SlotError> {
        let mut filter_parts = Vec::new();

        if let Some(doctor_id) = doctor_id {
            filter_parts.push(format!("doctor_id=eq.{}", doctor_id));
        }
        if let Some(date) = date {
            filter_parts.push(format!("date=eq.{}", date));
        }
        if let Some(status) = status {
            filter_parts.push(format!("status=eq.{}", status));
        }
        filter_parts.push("order=date.asc,start_time.asc".to_string());

        let result = self.store
            .select(SLOTS, &filter_parts.join("&"), auth_token)
            .await
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        parse_slots(result)
    }

    pub async fn block_slot(
        &self,
        hospital_id: Uuid,
        slot_id: &str,
        expected_version: i64,
        auth_token: &str,
    ) -> Result<TimeSlot, SlotError> {
        let slot = self.get_owned_slot(hospital_id, slot_id, auth_token).await?;
        SlotLifecycle::validate_transition(slot.status, SlotStatus::Blocked)?;

        self.apply_transition(&slot, SlotStatus::Blocked, expected_version, json!({}), auth_token)
            .await
    }

    pub async fn unblock_slot(
        &self,
        hospital_id: Uuid,
        slot_id: &str,
        expected_version: i64,
        auth_token: &str,
    ) -> Result<TimeSlot, SlotError> {
        let slot = self.get_owned_slot(hospital_id, slot_id, auth_token).await?;
        SlotLifecycle::validate_transition(slot.status, SlotStatus::Available)?;

        self.apply_transition(&slot, SlotStatus::Available, expected_version, json!({}), auth_token)
            .await
    }

    /// Book an available slot, attaching the patient metadata in the same
    /// guarded write as the status change.
    pub async fn book_slot(
        &self,
        hospital_id: Uuid,
        slot_id: &str,
        booked_by: &str,
        request: &BookSlotRequest,
        auth_token: &str,
    ) -> Result<TimeSlot, SlotError> {
        let slot = self.get_owned_slot(hospital_id, slot_id, auth_token).await?;
        SlotLifecycle::validate_transition(slot.status, SlotStatus::Booked)?;

        let booking_fields = json!({
            "booked_by": booked_by,
            "patient_id": request.patient_id,
            "patient_name": request.patient_name,
            "patient_phone": request.patient_phone,
            "booked_at": Utc::now().to_rfc3339(),
            "appointment_type": request.appointment_type,
        });

        self.apply_transition(&slot, SlotStatus::Booked, request.version, booking_fields, auth_token)
            .await
    }

    /// Delete a slot. Booked slots are refused; a patient-facing reference
    /// must never dangle.
    pub async fn delete_slot(
        &self,
        hospital_id: Uuid,
        slot_id: &str,
        auth_token: &str,
    ) -> Result<(), SlotError> {
        let slot = self.get_owned_slot(hospital_id, slot_id, auth_token).await?;
        SlotLifecycle::validate_delete(slot.status)?;

        let filter = format!("id=eq.{}", slot.id);
        self.store
            .delete(SLOTS, &filter, Some(auth_token))
            .await
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        debug!("Deleted slot {}", slot.id);
        Ok(())
    }

    // Private helpers

    /// Write the transition with the version as part of the filter. A miss
    /// means another session moved the slot first.
    async fn apply_transition(
        &self,
        slot: &TimeSlot,
        next: SlotStatus,
        expected_version: i64,
        extra_fields: Value,
        auth_token: &str,
    ) -> Result<TimeSlot, SlotError> {
        if slot.version != expected_version {
            return Err(SlotError::VersionConflict);
        }

        let mut fields = serde_json::Map::new();
        fields.insert("status".to_string(), json!(next));
        fields.insert("version".to_string(), json!(expected_version + 1));
        if let Value::Object(extra) = extra_fields {
            fields.extend(extra);
        }

        let filter = format!("id=eq.{}&version=eq.{}", slot.id, expected_version);
        let result = self.store
            .patch_returning(SLOTS, &filter, Value::Object(fields), Some(auth_token))
            .await
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        let record = result.into_iter().next().ok_or(SlotError::VersionConflict)?;

        let updated: TimeSlot = serde_json::from_value(record)
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        info!("Slot {} moved {} -> {}", updated.id, slot.status, updated.status);
        Ok(updated)
    }

    async fn check_window_is_free(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        window_start: u32,
        window_end: u32,
        auth_token: &str,
    ) -> Result<(), SlotError> {
        let filter = format!("doctor_id=eq.{}&date=eq.{}", doctor_id, date);
        let existing = self.store
            .select(SLOTS, &filter, Some(auth_token))
            .await
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        for slot in parse_slots(existing)? {
            let slot_start = to_minutes(&slot.start_time)?;
            let slot_end = to_minutes(&slot.end_time)?;

            if slot_start < window_end && slot_end > window_start {
                return Err(SlotError::OverlappingWindow);
            }
        }

        Ok(())
    }

    async fn get_owned_doctor(
        &self,
        hospital_id: Uuid,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<Doctor, SlotError> {
        let result = self.store
            .select_by_field("doctors", "id", &doctor_id.to_string(), Some(auth_token))
            .await
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        let record = result.into_iter().next().ok_or(SlotError::DoctorNotFound)?;

        let doctor: Doctor = serde_json::from_value(record)
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        if doctor.hospital_id != hospital_id {
            return Err(SlotError::Unauthorized);
        }

        Ok(doctor)
    }

    async fn get_owned_slot(
        &self,
        hospital_id: Uuid,
        slot_id: &str,
        auth_token: &str,
    ) -> Result<TimeSlot, SlotError> {
        let result = self.store
            .select_by_field(SLOTS, "id", slot_id, Some(auth_token))
            .await
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        let record = result.into_iter().next().ok_or(SlotError::NotFound)?;

        let slot: TimeSlot = serde_json::from_value(record)
            .map_err(|e| SlotError::StoreError(e.to_string()))?;

        if slot.hospital_id != hospital_id {
            return Err(SlotError::Unauthorized);
        }

        Ok(slot)
    }
}

fn parse_slots(records: Vec<Value>) -> Result<Vec<TimeSlot>, SlotError> {
    records.into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<TimeSlot>, _>>()
        .map_err(|e| SlotError::StoreError(e.to_string()))
}
