pub mod calendar;
pub mod calendar_service;
pub mod catalog_service;
pub mod dashboard_service;
pub mod employee_service;
pub mod form_field_service;
pub mod lead_service;
pub mod note_service;
pub mod pricing;
pub mod quotation_service;
pub mod storage_service;

use bson::oid::ObjectId;
use chrono::{Datelike, NaiveDate};

use crate::dto::non_blank;
use crate::util::error::ServiceError;

/// Parses an id carried inside a request body; blank means absent.
pub(crate) fn parse_optional_id(raw: Option<String>, label: &str) -> Result<Option<ObjectId>, ServiceError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) => ObjectId::parse_str(&value)
            .map(Some)
            .map_err(|_| ServiceError::InvalidInput(format!("Invalid {} id: {}", label, value))),
    }
}

/// Trimmed `value`, or `InvalidInput(message)` when only whitespace is left.
pub(crate) fn required_text(value: &str, message: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Dates are stored and range-filtered as `YYYY-MM-DD` strings, which only
/// sort correctly while the year has exactly four digits.
pub(crate) fn in_storable_range(date: NaiveDate) -> bool {
    (0..=9999).contains(&date.year())
}

/// Parses a `YYYY-MM-DD` value; blank means absent.
pub(crate) fn parse_optional_date(raw: Option<String>, label: &str) -> Result<Option<NaiveDate>, ServiceError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .ok()
            .filter(|date| in_storable_range(*date))
            .map(Some)
            .ok_or_else(|| ServiceError::InvalidInput(format!("{} must be a YYYY-MM-DD date", label))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_id() {
        assert_eq!(parse_optional_id(None, "lead").unwrap(), None);
        assert_eq!(parse_optional_id(Some(" ".to_string()), "lead").unwrap(), None);
        let id = ObjectId::new();
        assert_eq!(parse_optional_id(Some(id.to_hex()), "lead").unwrap(), Some(id));
        assert!(matches!(
            parse_optional_id(Some("nope".to_string()), "lead"),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text(" Ana ", "Name is required").unwrap(), "Ana");
        assert_eq!(
            required_text("   ", "Name is required"),
            Err(ServiceError::InvalidInput("Name is required".to_string()))
        );
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(
            parse_optional_date(Some("2024-08-15".to_string()), "Check-in date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 15)
        );
        assert_eq!(parse_optional_date(Some(String::new()), "Check-in date").unwrap(), None);
        assert!(parse_optional_date(Some("15/08/2024".to_string()), "Check-in date").is_err());
        assert!(parse_optional_date(Some("+10000-01-04".to_string()), "Check-in date").is_err());
    }

    #[test]
    fn test_storable_range_keeps_four_digit_years() {
        assert!(in_storable_range(NaiveDate::from_ymd_opt(9999, 12, 31).unwrap()));
        assert!(!in_storable_range(NaiveDate::from_ymd_opt(10000, 1, 1).unwrap()));
        assert!(!in_storable_range(NaiveDate::from_ymd_opt(-1, 1, 1).unwrap()));
    }
}
