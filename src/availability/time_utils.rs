use crate::error::{AvailabilityError, Result};
use super::types::Minutes;

/// Literal used by callers to mark a day as unavailable.
pub const UNAVAILABLE_LITERAL: &str = "N/A";

/// Parses a time literal to minutes past midnight.
///
/// `"N/A"` (any case) is the unavailable sentinel and parses to `None`.
/// Otherwise the literal must be `HH:MM` with hours 0-23 and minutes 0-59;
/// each field is one or two ASCII digits, so `"9:30"` parses like `"09:30"`
/// but signs and extra zeros (`"+9:30"`, `"009:30"`) are rejected.
/// Surrounding whitespace is trimmed before matching.
pub fn parse_time_literal(text: &str) -> Result<Option<Minutes>> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case(UNAVAILABLE_LITERAL) {
        return Ok(None);
    }

    let invalid = || AvailabilityError::InvalidFormat(text.to_string());

    let (hours_str, minutes_str) = trimmed.split_once(':').ok_or_else(invalid)?;
    // u16::from_str alone would admit a leading `+` and arbitrary zeros
    let digits = |s: &str| !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(hours_str) || !digits(minutes_str) {
        return Err(invalid());
    }

    let hours: u16 = hours_str.parse().map_err(|_| invalid())?;
    let minutes: u16 = minutes_str.parse().map_err(|_| invalid())?;
    if hours >= 24 || minutes >= 60 {
        return Err(invalid());
    }

    Ok(Some(hours * 60 + minutes))
}

/// Formats minutes past midnight as a zero-padded `HH:MM` string.
pub fn format_minutes(minutes: Minutes) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_times() {
        assert_eq!(parse_time_literal("00:00"), Ok(Some(0)));
        assert_eq!(parse_time_literal("09:30"), Ok(Some(570)));
        assert_eq!(parse_time_literal("9:30"), Ok(Some(570)));
        assert_eq!(parse_time_literal("23:59"), Ok(Some(1439)));
        assert_eq!(parse_time_literal(" 12:05 "), Ok(Some(725)));
    }

    #[test]
    fn parses_sentinel_any_case() {
        assert_eq!(parse_time_literal("N/A"), Ok(None));
        assert_eq!(parse_time_literal("n/a"), Ok(None));
        assert_eq!(parse_time_literal(" N/a "), Ok(None));
    }

    #[test]
    fn rejects_bad_literals() {
        for bad in [
            "24:00", "12:60", "99:99", "12", ":30", "12:", "ab:cd", "12:30:00", "", "NA",
            "-1:30", "+9:30", "009:30", "9:+5", "9:030", "1 2:30",
        ] {
            assert_eq!(
                parse_time_literal(bad),
                Err(AvailabilityError::InvalidFormat(bad.to_string())),
                "literal {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_minutes(0), "00:00");
        assert_eq!(format_minutes(570), "09:30");
        assert_eq!(format_minutes(1439), "23:59");
        assert_eq!(format_minutes(65), "01:05");
    }
}
