use chrono::NaiveDate;
use uuid::Uuid;

use slot_cell::models::SlotError;
use slot_cell::{SlotGenerator, SlotStatus, TimeSlot};

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn generate(start: &str, end: &str, duration: i32) -> Result<Vec<TimeSlot>, SlotError> {
    SlotGenerator::generate(Uuid::new_v4(), Uuid::new_v4(), test_date(), start, end, duration)
}

#[test]
fn fills_an_evenly_divisible_window() {
    let slots = generate("09:00", "10:00", 15).unwrap();

    assert_eq!(slots.len(), 4);
    assert_eq!(slots[0].start_time, "09:00");
    assert_eq!(slots[0].end_time, "09:15");
    assert_eq!(slots[3].start_time, "09:45");
    assert_eq!(slots[3].end_time, "10:00");
}

#[test]
fn drops_a_trailing_remainder() {
    // 50 minutes at 20 per slot: two slots fit, the last 10 minutes do not
    let slots = generate("09:00", "09:50", 20).unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start_time, "09:00");
    assert_eq!(slots[0].end_time, "09:20");
    assert_eq!(slots[1].start_time, "09:20");
    assert_eq!(slots[1].end_time, "09:40");
}

#[test]
fn emits_nothing_for_a_window_shorter_than_one_slot() {
    let slots = generate("09:00", "09:10", 15).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn emits_nothing_when_start_is_not_before_end() {
    assert!(generate("10:00", "09:00", 15).unwrap().is_empty());
    assert!(generate("09:00", "09:00", 15).unwrap().is_empty());
}

#[test]
fn slot_count_follows_the_window_size() {
    for (start, end, duration, expected) in [
        ("08:00", "12:00", 30, 8),
        ("08:00", "12:00", 60, 4),
        ("00:00", "23:59", 60, 23),
        ("09:15", "09:45", 10, 3),
    ] {
        let slots = generate(start, end, duration).unwrap();
        assert_eq!(
            slots.len(), expected,
            "window {} - {} at {} min", start, end, duration
        );
    }
}

#[test]
fn slots_are_contiguous_and_sorted() {
    let slots = generate("08:00", "17:00", 25).unwrap();

    for pair in slots.windows(2) {
        assert_eq!(pair[0].end_time, pair[1].start_time);
        assert!(pair[0].start_time < pair[1].start_time);
    }
}

#[test]
fn new_slots_start_available_at_version_one() {
    let slots = generate("09:00", "10:00", 20).unwrap();

    for slot in &slots {
        assert_eq!(slot.status, SlotStatus::Available);
        assert_eq!(slot.version, 1);
        assert!(slot.booked_by.is_none());
        assert!(slot.booked_at.is_none());
    }
}

#[test]
fn rejects_non_positive_durations() {
    for duration in [0, -1, -30] {
        let result = generate("09:00", "10:00", duration);
        assert!(
            matches!(result, Err(SlotError::InvalidParameter(_))),
            "duration {} should be rejected", duration
        );
    }
}

#[test]
fn rejects_malformed_window_times() {
    assert!(matches!(generate("9:00", "10:00", 15), Err(SlotError::InvalidParameter(_))));
    assert!(matches!(generate("09:00", "25:00", 15), Err(SlotError::InvalidParameter(_))));
}
