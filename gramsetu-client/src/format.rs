/// Display formatting helpers
use chrono::{DateTime, Utc};

/// Renders an optional timestamp as `dd/MM/yyyy`
///
/// Absent values render as `"N/A"`.
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// Parses an RFC 3339 string and renders it as `dd/MM/yyyy`
///
/// Empty input renders as `"N/A"`, unparseable input as `"Invalid Date"`.
pub fn format_date_str(raw: &str) -> String {
    if raw.is_empty() {
        return "N/A".to_string();
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => "Invalid Date".to_string(),
    }
}
