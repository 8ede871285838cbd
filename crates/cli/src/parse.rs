//! Argument parsers for clap

use chrono::{DateTime, NaiveDate, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a due date given as `YYYY-MM-DD` (midnight UTC) or full RFC 3339
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .ok_or_else(|| format!("invalid date: {value}"));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| format!("expected YYYY-MM-DD or an RFC 3339 timestamp, got {value:?}"))
}

/// Render a due date the way `parse_date` accepts it
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}
