//! Timestamp formatting utilities
//!
//! Timestamps are written straight into the record buffer. The RFC 3339
//! formats are rendered digit by digit so the hot path does not allocate;
//! `Custom` goes through chrono's strftime machinery.

use super::encoder::ByteWriter;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use logf::core::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Rfc3339Millis;
/// let mut buf = Vec::new();
/// format.write(&Utc::now(), &mut buf);
/// assert!(buf.ends_with(b"Z"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Rfc3339Millis,

    /// RFC 3339 with microseconds: `2025-01-08T10:30:45.123456Z`
    Rfc3339Micros,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use logf::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Append the formatted timestamp to `buf`.
    ///
    /// A custom format string chrono cannot render leaves nothing behind;
    /// the encoder substitutes a placeholder in that case.
    pub fn write(&self, datetime: &DateTime<Utc>, buf: &mut Vec<u8>) {
        // Only a bad strftime string can fail.
        let start = buf.len();
        let result = match self {
            TimestampFormat::Rfc3339Millis => {
                write_rfc3339(datetime, datetime.timestamp_subsec_millis(), 3, buf)
            }
            TimestampFormat::Rfc3339Micros => {
                write_rfc3339(datetime, datetime.timestamp_subsec_micros(), 6, buf)
            }
            TimestampFormat::Unix => write!(ByteWriter(buf), "{}", datetime.timestamp()),
            TimestampFormat::UnixMillis => {
                write!(ByteWriter(buf), "{}", datetime.timestamp_millis())
            }
            TimestampFormat::Custom(format_str) => {
                write!(ByteWriter(buf), "{}", datetime.format(format_str))
            }
        };
        if result.is_err() {
            buf.truncate(start);
        }
    }

    /// Format into a fresh `String`, for callers outside the hot path
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        let mut buf = Vec::with_capacity(32);
        self.write(datetime, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }
}

fn write_rfc3339(
    datetime: &DateTime<Utc>,
    fraction: u32,
    width: usize,
    buf: &mut Vec<u8>,
) -> fmt::Result {
    write!(
        ByteWriter(buf),
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:0width$}Z",
        datetime.year(),
        datetime.month(),
        datetime.day(),
        datetime.hour(),
        datetime.minute(),
        datetime.second(),
        fraction,
        width = width
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_rfc3339_millis_format() {
        let result = TimestampFormat::Rfc3339Millis.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_rfc3339_micros_format() {
        let result = TimestampFormat::Rfc3339Micros.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456Z");
    }

    #[test]
    fn test_rfc3339_matches_chrono() {
        let dt = fixed_datetime();
        let ours = TimestampFormat::Rfc3339Millis.format(&dt);
        let chrono = dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        assert_eq!(ours, chrono);
    }

    #[test]
    fn test_unix_formats() {
        let secs: i64 = TimestampFormat::Unix
            .format(&fixed_datetime())
            .parse()
            .expect("valid unix timestamp");
        let millis: i64 = TimestampFormat::UnixMillis
            .format(&fixed_datetime())
            .parse()
            .expect("valid unix millis timestamp");
        assert_eq!(secs, 1736332245);
        assert_eq!(millis, 1736332245123);
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_write_appends() {
        let mut buf = b"timestamp=".to_vec();
        TimestampFormat::Unix.write(&fixed_datetime(), &mut buf);
        assert_eq!(buf, b"timestamp=1736332245");
    }

    #[test]
    fn test_invalid_custom_format_writes_nothing() {
        let mut buf = b"x".to_vec();
        TimestampFormat::Custom("%Q".to_string()).write(&fixed_datetime(), &mut buf);
        assert_eq!(buf, b"x");
    }

    #[test]
    fn test_is_numeric() {
        assert!(!TimestampFormat::Rfc3339Millis.is_numeric());
        assert!(TimestampFormat::Unix.is_numeric());
        assert!(TimestampFormat::UnixMillis.is_numeric());
        assert!(!TimestampFormat::Custom("%Y".to_string()).is_numeric());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&TimestampFormat::Rfc3339Millis).expect("serialize");
        assert_eq!(json, "\"Rfc3339Millis\"");

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }
}
