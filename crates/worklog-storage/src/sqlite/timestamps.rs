//! Timestamp conversion between `DateTime<Utc>` and SQLite TEXT.

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

/// Current time at the precision that survives a round trip through storage.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Formats a `DateTime<Utc>` as ISO 8601 TEXT for SQLite.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parses an ISO 8601 TEXT value (or SQLite's `YYYY-MM-DD HH:MM:SS`) into a
/// `DateTime<Utc>`.
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").map(|n| n.and_utc())
        })
}

/// Reads a TEXT column and parses it as a timestamp, surfacing malformed
/// values as a conversion error instead of substituting a default.
pub(crate) fn get_datetime(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(column)?;
    parse_datetime(&text).map_err(|e| {
        let idx = row.as_ref().column_index(column).unwrap_or_default();
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_then_parse_is_lossless_at_millis() {
        let ts = now();
        assert_eq!(parse_datetime(&format_datetime(&ts)).unwrap(), ts);
    }

    #[test]
    fn parses_sqlite_default_format() {
        let ts = parse_datetime("2024-03-01 12:30:00").unwrap();
        assert_eq!(format_datetime(&ts), "2024-03-01T12:30:00.000Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("yesterday").is_err());
    }
}
