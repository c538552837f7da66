//! Parsing and formatting of textual dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

/// Represents a point in time held by a `date` attribute.
pub type Timestamp = DateTime<Utc>;

/// Errors that can occur during timestamp parsing.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The timestamp string is empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The timestamp value is invalid.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),

    /// Nanosecond precision is not supported.
    #[error("Nanosecond precision timestamps are not supported")]
    NanosecondPrecision,
}

/// Detected precision of a Unix timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnixPrecision {
    /// Seconds (<=10 digits)
    Seconds,
    /// Milliseconds (<=13 digits)
    Milliseconds,
    /// Microseconds (<=16 digits)
    Microseconds,
}

/// Detects the precision of a Unix timestamp based on digit count.
///
/// # Errors
///
/// Returns `TimestampError::NanosecondPrecision` if the timestamp has more than 16 digits.
#[allow(clippy::cast_possible_truncation)]
pub fn detect_unix_precision(timestamp: f64) -> Result<UnixPrecision, TimestampError> {
    let int_part = timestamp.abs().trunc() as i64;
    let digit_count = if int_part == 0 {
        1
    } else {
        int_part.to_string().len()
    };

    match digit_count {
        0..=10 => Ok(UnixPrecision::Seconds),
        11..=13 => Ok(UnixPrecision::Milliseconds),
        14..=16 => Ok(UnixPrecision::Microseconds),
        _ => Err(TimestampError::NanosecondPrecision),
    }
}

/// Parses a timestamp from its textual form.
///
/// Supports:
/// - Unix timestamps (seconds, milliseconds, microseconds)
/// - ISO 8601 / RFC 3339 strings
/// - RFC 2822 strings
/// - Common human-readable formats
///
/// # Errors
///
/// Returns `TimestampError` if the input cannot be parsed.
pub fn parse_timestamp(input: &str) -> Result<Timestamp, TimestampError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    if let Ok(num) = trimmed.parse::<f64>() {
        return parse_unix_timestamp(num);
    }

    if let Ok(dt) = parse_iso8601(trimmed) {
        return Ok(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    parse_human_readable(trimmed)
}

/// Parses a Unix timestamp with automatic precision detection.
///
/// # Errors
///
/// Returns `TimestampError` for out-of-range or nanosecond values.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_unix_timestamp(value: f64) -> Result<Timestamp, TimestampError> {
    if !value.is_finite() {
        return Err(TimestampError::InvalidFormat(value.to_string()));
    }

    // Fractional values are always seconds
    if value.fract() != 0.0 {
        let secs = value.trunc() as i64;
        let nanos = (value.fract().abs() * 1_000_000_000.0) as u32;
        return Utc
            .timestamp_opt(secs, nanos)
            .single()
            .ok_or_else(|| TimestampError::InvalidFormat(value.to_string()));
    }

    let precision = detect_unix_precision(value)?;
    let timestamp_i64 = value as i64;

    let (secs, nanos) = match precision {
        UnixPrecision::Seconds => (timestamp_i64, 0),
        UnixPrecision::Milliseconds => (
            timestamp_i64.div_euclid(1000),
            (timestamp_i64.rem_euclid(1000) * 1_000_000) as u32,
        ),
        UnixPrecision::Microseconds => (
            timestamp_i64.div_euclid(1_000_000),
            (timestamp_i64.rem_euclid(1_000_000) * 1000) as u32,
        ),
    };

    Utc.timestamp_opt(secs, nanos)
        .single()
        .ok_or_else(|| TimestampError::InvalidFormat(value.to_string()))
}

fn parse_iso8601(s: &str) -> Result<Timestamp, TimestampError> {
    let normalized = s.replace('Z', "+00:00");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.with_timezone(&Utc));
    }

    let zoned = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%:z"];
    for fmt in zoned {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let naive = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d",
    ];
    parse_naive(&normalized, &naive).ok_or_else(|| TimestampError::InvalidFormat(s.to_string()))
}

fn parse_human_readable(s: &str) -> Result<Timestamp, TimestampError> {
    let formats = [
        "%B %d, %Y",          // October 5, 2023
        "%b %d, %Y",          // Oct 5, 2023
        "%d %B %Y",           // 5 October 2023
        "%d %b %Y",           // 5 Oct 2023
        "%m/%d/%Y",           // 10/05/2023
        "%Y/%m/%d",           // 2023/10/05
        "%B %d, %Y %H:%M:%S", // October 5, 2023 14:30:00
        "%b %d, %Y %H:%M:%S", // Oct 5, 2023 14:30:00
    ];

    parse_naive(s, &formats).ok_or_else(|| TimestampError::InvalidFormat(s.to_string()))
}

fn parse_naive(s: &str, formats: &[&str]) -> Option<Timestamp> {
    formats.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(s, fmt)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, fmt)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
            .map(|naive| Utc.from_utc_datetime(&naive))
    })
}

/// Formats a timestamp as an ISO 8601 string in UTC (`...Z`).
///
/// Sub-second digits are printed only when present, so parsing the output
/// yields the same instant.
#[must_use]
pub fn format_iso8601(dt: &Timestamp) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_detect_unix_precision() {
        assert_eq!(detect_unix_precision(1_696_512_000.0).unwrap(), UnixPrecision::Seconds);
        assert_eq!(
            detect_unix_precision(1_696_512_000_000.0).unwrap(),
            UnixPrecision::Milliseconds
        );
        assert_eq!(
            detect_unix_precision(1_696_512_000_000_000.0).unwrap(),
            UnixPrecision::Microseconds
        );
    }

    #[test]
    fn test_parse_iso8601() {
        let dt = parse_timestamp("2023-10-05T14:30:00Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2023, 10, 5, 14));
    }

    #[test]
    fn test_parse_iso8601_with_offset() {
        let dt = parse_timestamp("2023-10-05T14:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_timestamp("2012-06-01").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2012, 6, 1, 0));
    }

    #[test]
    fn test_parse_unix_seconds() {
        let dt = parse_timestamp("1696512000").unwrap();
        assert_eq!(dt.year(), 2023);
    }

    #[test]
    fn test_parse_rfc2822_and_human() {
        assert_eq!(parse_timestamp("Thu, 05 Oct 2023 14:30:00 +0000").unwrap().day(), 5);
        assert_eq!(parse_timestamp("October 5, 2023").unwrap().month(), 10);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(parse_timestamp(""), Err(TimestampError::EmptyString)));
        assert!(matches!(
            parse_timestamp("yesterday-ish"),
            Err(TimestampError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_format_round_trip() {
        let dt = parse_timestamp("2023-10-05T14:30:00.123Z").unwrap();
        let text = format_iso8601(&dt);

        assert_eq!(text, "2023-10-05T14:30:00.123Z");
        assert_eq!(parse_timestamp(&text).unwrap(), dt);
    }
}
