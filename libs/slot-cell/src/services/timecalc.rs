use crate::models::SlotError;

/// Parse a zero-padded 24-hour `"HH:MM"` string into minutes since
/// midnight (0-1439). Times are hospital-local wall clock; there is no
/// timezone handling anywhere in slot arithmetic.
pub fn to_minutes(hhmm: &str) -> Result<u32, SlotError> {
    let invalid = || SlotError::InvalidParameter(format!("Invalid time string: {:?}", hhmm));

    let (hours_str, minutes_str) = hhmm.split_once(':').ok_or_else(invalid)?;

    if hours_str.len() != 2 || minutes_str.len() != 2 {
        return Err(invalid());
    }

    let hours: u32 = hours_str.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes_str.parse().map_err(|_| invalid())?;

    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

/// Inverse of `to_minutes`, zero-padding both components.
pub fn from_minutes(total: u32) -> String {
    format!("{:02}:{:02}", total / 60, total % 60)
}
