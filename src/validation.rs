//! Input validation shared by the symptom log, profile and checklist writes.
//!
//! The scoring engine trusts its inputs; these checks run at the write
//! boundary so stored data is always in range.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("Pain level must be between 0 and 10 (got {0})")]
    PainLevelOutOfRange(i32),

    #[error("Invalid {field} format (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str },

    #[error("Surgery date cannot be in the future")]
    SurgeryDateInFuture,

    #[error("Please check your surgery date. It seems to be more than 2 years ago.")]
    SurgeryDateTooOld,

    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{field} must be {max} characters or fewer")]
    TooLong { field: &'static str, max: usize },

    #[error("Please enter a valid email address")]
    InvalidEmail,
}

/// Parses a `YYYY-MM-DD` field, trimming surrounding whitespace.
pub fn parse_iso_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate { field })
}

pub fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::Required { field });
    }
    if len < min || len > max {
        return Err(ValidationError::Length { field, min, max });
    }
    Ok(())
}

pub fn check_max_len(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        _ => Ok(()),
    }
}

pub fn check_email(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "Email" });
    }
    if !EMAIL_PATTERN.is_match(trimmed) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Blank optional text is stored as NULL.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_iso_date_accepts_valid() {
        let d = parse_iso_date("Date", "2025-01-15").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn parse_iso_date_trims() {
        assert!(parse_iso_date("Date", " 2025-01-15 ").is_ok());
    }

    #[test]
    fn parse_iso_date_rejects_garbage() {
        assert_eq!(
            parse_iso_date("Date", "15/01/2025"),
            Err(ValidationError::InvalidDate { field: "Date" })
        );
        assert_eq!(
            parse_iso_date("Date", "2025-02-30"),
            Err(ValidationError::InvalidDate { field: "Date" })
        );
    }

    #[test]
    fn parse_iso_date_empty_is_required() {
        assert_eq!(
            parse_iso_date("Surgery date", "   "),
            Err(ValidationError::Required { field: "Surgery date" })
        );
    }

    #[test]
    fn length_bounds() {
        assert!(check_length("First name", "Jo", 2, 30).is_ok());
        assert!(matches!(
            check_length("First name", "J", 2, 30),
            Err(ValidationError::Length { .. })
        ));
        assert!(matches!(
            check_length("First name", &"a".repeat(31), 2, 30),
            Err(ValidationError::Length { .. })
        ));
        assert!(matches!(
            check_length("First name", "", 2, 30),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn max_len_counts_chars_not_bytes() {
        // 10 two-byte chars fit a 10-char cap
        assert!(check_max_len("Location", Some("éééééééééé"), 10).is_ok());
        assert!(check_max_len("Location", Some("ééééééééééé"), 10).is_err());
        assert!(check_max_len("Location", None, 10).is_ok());
    }

    #[test]
    fn email_validation() {
        assert!(check_email("patient@example.com").is_ok());
        assert_eq!(check_email("not-an-email"), Err(ValidationError::InvalidEmail));
        assert_eq!(check_email("a b@c.d"), Err(ValidationError::InvalidEmail));
        assert!(matches!(
            check_email(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn normalize_optional_drops_blank() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" knee ".into())), Some("knee".into()));
        assert_eq!(normalize_optional(None), None);
    }
}
