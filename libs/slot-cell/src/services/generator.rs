use chrono::{NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::models::{SlotError, SlotStatus, TimeSlot};
use crate::services::timecalc::{from_minutes, to_minutes};

/// Derives the ordered set of fixed-duration slots covering a time window.
///
/// Pure computation; persistence of the result is the slot service's job.
pub struct SlotGenerator;

impl SlotGenerator {
    /// Emit `[cursor, cursor + duration)` repeatedly while the resulting end
    /// still fits inside the window. A trailing remainder shorter than one
    /// full duration is dropped - a truncated slot is never emitted - and
    /// `start >= end` yields an empty batch rather than an error.
    pub fn generate(
        doctor_id: Uuid,
        hospital_id: Uuid,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
        duration_minutes: i32,
    ) -> Result<Vec<TimeSlot>, SlotError> {
        if duration_minutes <= 0 {
            return Err(SlotError::InvalidParameter(
                "Slot duration must be a positive number of minutes".to_string(),
            ));
        }

        let window_start = to_minutes(start_time)?;
        let window_end = to_minutes(end_time)?;
        let duration = duration_minutes as u32;

        let mut slots = Vec::new();
        let mut cursor = window_start;

        while cursor + duration <= window_end {
            let slot_end = cursor + duration;

            slots.push(TimeSlot {
                id: Uuid::new_v4(),
                doctor_id,
                hospital_id,
                date,
                start_time: from_minutes(cursor),
                end_time: from_minutes(slot_end),
                status: SlotStatus::Available,
                version: 1,
                booked_by: None,
                patient_id: None,
                patient_name: None,
                patient_phone: None,
                booked_at: None,
                appointment_type: None,
                created_at: Utc::now(),
            });

            cursor = slot_end;
        }

        debug!(
            "Generated {} slots for doctor {} on {} ({} - {}, {} min each)",
            slots.len(), doctor_id, date, start_time, end_time, duration_minutes
        );

        Ok(slots)
    }
}
