//! Timestamp parsing for backend records
//!
//! The backend stores `datetime.now().isoformat()` values, which carry no
//! offset. Those are read as UTC; RFC 3339 values are accepted as-is.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Short local date for dialogs, e.g. `01/06/2025 09:00`
pub fn display(value: DateTime<Utc>) -> String {
    value.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert!(parse("2025-06-01T12:00:00Z").is_some());
        assert!(parse("2025-06-01T09:00:00-03:00").is_some());
        assert_eq!(
            parse("2025-06-01T12:00:00"),
            parse("2025-06-01T12:00:00+00:00")
        );
        assert!(parse("yesterday").is_none());
    }

    #[test]
    fn test_display_format() {
        let shown = display(parse("2025-06-01T12:00:00Z").unwrap());
        assert_eq!(shown.len(), "01/06/2025 12:00".len());
        assert!(shown.contains("/2025 "));
    }
}
