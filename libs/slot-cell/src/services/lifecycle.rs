use tracing::{debug, warn};

use crate::models::{SlotError, SlotStatus};

/// The state machine governing a slot's status field.
///
/// Slots start AVAILABLE and have no terminal state; deletion removes the
/// record rather than marking it. BOOKED and BLOCKED do not connect: a
/// booked slot must be released through its own flow before it can be
/// blocked, and vice versa.
pub struct SlotLifecycle;

impl SlotLifecycle {
    /// Validate that a status transition is allowed.
    pub fn validate_transition(
        current: SlotStatus,
        next: SlotStatus,
    ) -> Result<(), SlotError> {
        debug!("Validating slot transition {} -> {}", current, next);

        if !Self::valid_transitions(current).contains(&next) {
            warn!("Invalid slot transition attempted: {} -> {}", current, next);
            return Err(SlotError::IllegalTransition { from: current, to: next });
        }

        Ok(())
    }

    /// All valid next statuses for a given current status.
    pub fn valid_transitions(current: SlotStatus) -> Vec<SlotStatus> {
        match current {
            SlotStatus::Available => vec![SlotStatus::Blocked, SlotStatus::Booked],
            SlotStatus::Blocked => vec![SlotStatus::Available],
            SlotStatus::Booked => vec![],
        }
    }

    /// A slot may be deleted in any status except BOOKED; a booked slot
    /// still has a patient pointing at it.
    pub fn validate_delete(current: SlotStatus) -> Result<(), SlotError> {
        if current == SlotStatus::Booked {
            warn!("Attempted to delete a booked slot");
            return Err(SlotError::DeleteBooked);
        }

        Ok(())
    }
}
