//! Field validation for catalog and booking input.
//!
//! Rules mirror what the administrative console submits: short free-text
//! minimums, a 12-hour display time window, and single-word alphabetic tags.

use crate::error::{CoreError, Result};

/// Minimum seats per booking.
pub const MIN_SEATS_PER_BOOKING: u32 = 1;
/// Maximum seats per booking.
pub const MAX_SEATS_PER_BOOKING: u32 = 4;

/// Minimum length for event titles and descriptions.
const MIN_TEXT_LEN: usize = 6;

/// Validate a booking's seat count (1..=4).
///
/// # Errors
///
/// Returns `CoreError::InvalidSeatCount` when out of range.
pub const fn validate_seat_count(seats: u32) -> Result<()> {
    if seats < MIN_SEATS_PER_BOOKING || seats > MAX_SEATS_PER_BOOKING {
        return Err(CoreError::InvalidSeatCount { requested: seats });
    }
    Ok(())
}

/// Validate an event title.
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` when shorter than six characters.
pub fn validate_title(title: &str) -> Result<()> {
    validate_min_len("title", title)
}

/// Validate an event description.
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` when shorter than six characters.
pub fn validate_description(description: &str) -> Result<()> {
    validate_min_len("description", description)
}

fn validate_min_len(field: &'static str, value: &str) -> Result<()> {
    if value.chars().count() < MIN_TEXT_LEN {
        return Err(CoreError::InvalidInput {
            field,
            reason: format!("must be at least {MIN_TEXT_LEN} characters long"),
        });
    }
    Ok(())
}

/// Validate a non-empty field.
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` when blank.
pub fn validate_not_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Validate a total seat capacity (at least one seat).
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` when zero.
pub fn validate_capacity(total_seats: u32) -> Result<()> {
    if total_seats == 0 {
        return Err(CoreError::InvalidInput {
            field: "totalSeats",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Validate the display time window, e.g. `"10:00 AM - 04:30 PM"`.
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` when the string does not match
/// `HH:MM AM - HH:MM PM`.
pub fn validate_time_window(value: &str) -> Result<()> {
    let invalid = || CoreError::InvalidInput {
        field: "time",
        reason: "must be in format: HH:MM AM - HH:MM PM".to_string(),
    };

    let (start, end) = value.split_once(" - ").ok_or_else(invalid)?;
    if is_clock_time(start) && is_clock_time(end) {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Accepts `H:MM AM`/`HH:MM PM` with hours 0-23 and minutes 0-59.
fn is_clock_time(s: &str) -> bool {
    let Some((hhmm, meridiem)) = s.split_once(' ') else {
        return false;
    };
    if meridiem != "AM" && meridiem != "PM" {
        return false;
    }
    let Some((hh, mm)) = hhmm.split_once(':') else {
        return false;
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let hours_ok = (1..=2).contains(&hh.len())
        && all_digits(hh)
        && matches!(hh.parse::<u32>(), Ok(h) if h <= 23);
    let minutes_ok =
        mm.len() == 2 && all_digits(mm) && matches!(mm.parse::<u32>(), Ok(m) if m <= 59);
    hours_ok && minutes_ok
}

/// Validate the tag set: non-empty, each tag a single alphabetic word.
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` when empty or when a tag contains
/// anything but letters.
pub fn validate_tags(tags: &[String]) -> Result<()> {
    let invalid = |reason: &str| CoreError::InvalidInput {
        field: "tags",
        reason: reason.to_string(),
    };

    if tags.is_empty() {
        return Err(invalid("at least one tag is required"));
    }
    for tag in tags {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid(
                "tags must be words without spaces, numbers, or special characters",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn seat_count_bounds() {
        assert!(validate_seat_count(0).is_err());
        assert!(validate_seat_count(1).is_ok());
        assert!(validate_seat_count(4).is_ok());
        assert!(validate_seat_count(5).is_err());
    }

    #[test]
    fn time_window_accepts_display_format() {
        assert!(validate_time_window("10:00 AM - 04:30 PM").is_ok());
        assert!(validate_time_window("9:15 AM - 11:45 PM").is_ok());
    }

    #[test]
    fn time_window_rejects_malformed_input() {
        for bad in [
            "10:00 - 04:30",
            "10:00AM - 04:30PM",
            "25:00 AM - 04:30 PM",
            "10:61 AM - 04:30 PM",
            "10:00 AM",
            "",
        ] {
            assert!(validate_time_window(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn tags_must_be_alphabetic_words() {
        let ok = vec!["music".to_string(), "Outdoor".to_string()];
        assert!(validate_tags(&ok).is_ok());

        assert!(validate_tags(&[]).is_err());
        assert!(validate_tags(&["rock n roll".to_string()]).is_err());
        assert!(validate_tags(&["tag2".to_string()]).is_err());
        assert!(validate_tags(&[String::new()]).is_err());
    }

    #[test]
    fn short_titles_are_rejected() {
        assert!(validate_title("Gala").is_err());
        assert!(validate_title("Gala night").is_ok());
    }

    proptest! {
        #[test]
        fn seat_count_validation_matches_range(seats in 0u32..100) {
            let expected_ok = (1..=4).contains(&seats);
            prop_assert_eq!(validate_seat_count(seats).is_ok(), expected_ok);
        }

        #[test]
        fn alphabetic_tags_always_pass(tag in "[a-zA-Z]{1,16}") {
            prop_assert!(validate_tags(&[tag]).is_ok());
        }
    }
}
