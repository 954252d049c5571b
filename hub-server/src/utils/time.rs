//! Time helpers — dates and quota periods
//!
//! Date strings are validated at the API handler layer; repositories
//! only see already-validated text and `i64` unix millis.

use chrono::NaiveDate;

use super::{AppError, AppResult};

/// Parse a calendar date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Validate an optional clock time string (HH:MM)
pub fn validate_time(time: &str) -> AppResult<()> {
    chrono::NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// Whether `date` (YYYY-MM-DD) is strictly after today, UTC
pub fn is_upcoming(date: &str) -> bool {
    parse_date(date)
        .map(|d| d > chrono::Utc::now().date_naive())
        .unwrap_or(false)
}

/// Grant lifetime in millis from a configured hour count
pub fn hours_to_millis(hours: i64) -> i64 {
    hours * 3_600_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-06-15").is_ok());
        assert!(parse_date("15/06/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_validate_time() {
        assert!(validate_time("09:30").is_ok());
        assert!(validate_time("25:00").is_err());
    }

    #[test]
    fn test_hours_to_millis() {
        assert_eq!(hours_to_millis(24), 86_400_000);
    }
}
