//! Submission-time checks over the whole form.

use thiserror::Error;

use super::state::FormState;

/// First rule the form failed; the message is shown to the user as-is.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload an Excel file and enter a valid driver name (non-empty).")]
    MissingFileOrDriver,
    #[error("Please provide break date, start time, and end time.")]
    IncompleteBreak,
    #[error("Please enter a valid break date (YYYY-MM-DD).")]
    InvalidBreakDate,
    #[error(
        "Please enter valid break times (HH:MM:SS, 24-hour, e.g., 13:00:00, hours 0-23, minutes 0-59, seconds 0-59)."
    )]
    InvalidBreakTime,
    #[error("Please provide an off date.")]
    MissingOffDate,
    #[error("Please enter a valid off date (YYYY-MM-DD).")]
    InvalidOffDate,
}

/// Run every rule in order and stop at the first failure.
pub fn validate(form: &FormState) -> Result<(), ValidationError> {
    if form.source_file.is_none() || form.driver_name.trim().is_empty() {
        return Err(ValidationError::MissingFileOrDriver);
    }

    if form.add_break {
        let w = &form.break_window;
        let (date, start, end) = (w.date.trim(), w.start_time.trim(), w.end_time.trim());
        if date.is_empty() || start.is_empty() || end.is_empty() {
            return Err(ValidationError::IncompleteBreak);
        }
        if !is_date_ymd(date) {
            return Err(ValidationError::InvalidBreakDate);
        }
        if !is_time_hms(start) || !is_time_hms(end) {
            return Err(ValidationError::InvalidBreakTime);
        }
    }

    if form.give_off {
        let off = form.off_date.trim();
        if off.is_empty() {
            return Err(ValidationError::MissingOffDate);
        }
        if !is_date_ymd(off) {
            return Err(ValidationError::InvalidOffDate);
        }
    }

    Ok(())
}

/// `YYYY-MM-DD` shape; the calendar itself is the backend's concern.
pub fn is_date_ymd(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}

/// `HH:MM:SS` on a 24-hour clock.
pub fn is_time_hms(s: &str) -> bool {
    let parts: Vec<&str> = s.split(':').collect();
    let [h, m, sec] = parts.as_slice() else {
        return false;
    };
    two_digits_at_most(h, 23) && two_digits_at_most(m, 59) && two_digits_at_most(sec, 59)
}

fn two_digits_at_most(s: &str, max: u32) -> bool {
    s.len() == 2
        && s.bytes().all(|c| c.is_ascii_digit())
        && s.parse::<u32>().is_ok_and(|v| v <= max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::state::{FieldUpdate, SourceFile};

    fn filled() -> FormState {
        FormState::default()
            .with(FieldUpdate::SourceFile(Some(SourceFile::new("schedule.xlsx"))))
            .with(FieldUpdate::DriverName("Jane Doe".into()))
    }

    fn with_break(date: &str, start: &str, end: &str) -> FormState {
        filled()
            .with(FieldUpdate::AddBreak(true))
            .with(FieldUpdate::BreakDate(date.into()))
            .with(FieldUpdate::BreakStart(start.into()))
            .with(FieldUpdate::BreakEnd(end.into()))
    }

    #[test]
    fn test_requires_file_and_driver_name() {
        assert_eq!(
            validate(&FormState::default()),
            Err(ValidationError::MissingFileOrDriver)
        );
        let blank_name = filled().with(FieldUpdate::DriverName("   ".into()));
        assert_eq!(validate(&blank_name), Err(ValidationError::MissingFileOrDriver));
        let no_file = filled().with(FieldUpdate::SourceFile(None));
        assert_eq!(validate(&no_file), Err(ValidationError::MissingFileOrDriver));
        assert_eq!(validate(&filled()), Ok(()));
    }

    #[test]
    fn test_break_date_separator_matters() {
        assert_eq!(
            validate(&with_break("2024/01/01", "13:00:00", "14:00:00")),
            Err(ValidationError::InvalidBreakDate)
        );
        assert_eq!(validate(&with_break("2024-01-01", "13:00:00", "14:00:00")), Ok(()));
    }

    #[test]
    fn test_break_time_ranges() {
        assert_eq!(
            validate(&with_break("2024-01-01", "24:00:00", "14:00:00")),
            Err(ValidationError::InvalidBreakTime)
        );
        assert_eq!(
            validate(&with_break("2024-01-01", "13:00:00", "13:60:00")),
            Err(ValidationError::InvalidBreakTime)
        );
        assert_eq!(validate(&with_break("2024-01-01", "00:00:00", "23:59:59")), Ok(()));
    }

    #[test]
    fn test_partially_entered_time_is_rejected() {
        assert_eq!(
            validate(&with_break("2024-01-01", ":05:00", "14:00:00")),
            Err(ValidationError::InvalidBreakTime)
        );
    }

    #[test]
    fn test_incomplete_break_is_checked_before_patterns() {
        assert_eq!(
            validate(&with_break("2024/01/01", "", "14:00:00")),
            Err(ValidationError::IncompleteBreak)
        );
    }

    #[test]
    fn test_end_before_start_is_accepted() {
        assert_eq!(validate(&with_break("2024-01-01", "15:00:00", "14:00:00")), Ok(()));
    }

    #[test]
    fn test_break_fields_ignored_when_flag_off() {
        let f = with_break("garbage", "99", "").with(FieldUpdate::AddBreak(false));
        assert_eq!(validate(&f), Ok(()));
    }

    #[test]
    fn test_off_date_rules() {
        let f = filled().with(FieldUpdate::GiveOff(true));
        assert_eq!(validate(&f), Err(ValidationError::MissingOffDate));
        let f = f.with(FieldUpdate::OffDate("01-03-2024".into()));
        assert_eq!(validate(&f), Err(ValidationError::InvalidOffDate));
        let f = f.with(FieldUpdate::OffDate(" 2024-03-01 ".into()));
        assert_eq!(validate(&f), Ok(()));
    }

    #[test]
    fn test_pattern_helpers() {
        assert!(is_date_ymd("2024-03-01"));
        assert!(!is_date_ymd("2024-3-01"));
        assert!(!is_date_ymd("２０２４-03-01"));
        assert!(is_time_hms("23:59:59"));
        assert!(!is_time_hms("23:59"));
        assert!(!is_time_hms("1:00:00"));
        assert!(!is_time_hms("+1:00:00"));
    }
}
