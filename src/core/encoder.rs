//! logfmt encoder for log records
//!
//! Renders one record as a single line:
//!
//! ```text
//! timestamp=2025-01-08T10:30:45.123Z level=info message="hello world" stack=testing
//! ```
//!
//! Everything is written straight into the caller's buffer. Values that
//! need quoting are escaped in place, so a record with plain fields costs
//! no allocation beyond buffer growth.

use super::field::{Field, Value, MISSING_VALUE};
use super::log_level::LogLevel;
use super::record::LogRecord;
use super::timestamp::TimestampFormat;
use std::fmt::{self, Write};

/// Written instead of a value whose `Display` impl reported an error
pub const BAD_VALUE: &str = "!BADVALUE";

const COLOR_RESET: &[u8] = b"\x1b[0m";

/// `fmt::Write` over a byte buffer.
///
/// Used instead of `io::Write for Vec<u8>`, whose `write_fmt` panics when a
/// `Display` impl reports an error the buffer never produced.
pub(crate) struct ByteWriter<'a>(pub(crate) &'a mut Vec<u8>);

impl fmt::Write for ByteWriter<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Encoder {
    color: bool,
    timestamp_format: TimestampFormat,
}

impl Encoder {
    pub fn new(color: bool, timestamp_format: TimestampFormat) -> Self {
        Self {
            color,
            timestamp_format,
        }
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    /// Encode `record` into `buf`, default fields ahead of the call-site
    /// fields, terminated by a newline.
    pub fn encode(&self, record: &LogRecord<'_>, defaults: &[Field], buf: &mut Vec<u8>) {
        let level = record.level;

        self.write_key(buf, level, "timestamp");
        let start = buf.len();
        self.timestamp_format.write(&record.timestamp, buf);
        finish_value(buf, start);

        buf.push(b' ');
        self.write_key(buf, level, "level");
        self.with_color(buf, level, |buf| buf.extend_from_slice(level.to_str().as_bytes()));

        buf.push(b' ');
        self.write_key(buf, level, "message");
        write_str_value(buf, record.message);

        if let Some(caller) = &record.caller {
            buf.push(b' ');
            self.write_key(buf, level, "caller");
            let start = buf.len();
            // Infallible: both parts are plain strings and integers.
            let _ = write!(ByteWriter(buf), "{}:{}", caller.file, caller.line);
            finish_value(buf, start);
        }

        for field in defaults {
            buf.push(b' ');
            self.write_key(buf, level, &field.key);
            write_value(buf, field.value.as_value());
        }

        for pair in record.fields.chunks(2) {
            buf.push(b' ');
            match pair[0] {
                Value::Str(key) => self.write_key(buf, level, key),
                other => {
                    self.with_color(buf, level, |buf| write_value_key(buf, other));
                    buf.push(b'=');
                }
            }
            match pair.get(1) {
                Some(value) => write_value(buf, *value),
                None => buf.extend_from_slice(MISSING_VALUE.as_bytes()),
            }
        }

        buf.push(b'\n');
    }

    /// Write `key=`, colored by level when color is enabled
    fn write_key(&self, buf: &mut Vec<u8>, level: LogLevel, key: &str) {
        self.with_color(buf, level, |buf| write_sanitized_key(buf, key));
        buf.push(b'=');
    }

    #[inline]
    fn with_color(&self, buf: &mut Vec<u8>, level: LogLevel, body: impl FnOnce(&mut Vec<u8>)) {
        if !self.color {
            body(buf);
            return;
        }
        buf.extend_from_slice(b"\x1b[");
        buf.extend_from_slice(level.color_code().to_fg_str().as_bytes());
        buf.push(b'm');
        body(buf);
        buf.extend_from_slice(COLOR_RESET);
    }
}

#[inline]
fn is_key_byte(b: u8) -> bool {
    b > b' ' && b != b'=' && b != b'"' && b != 0x7f
}

fn write_sanitized_key(buf: &mut Vec<u8>, key: &str) {
    if key.is_empty() {
        buf.push(b'_');
        return;
    }
    buf.extend(
        key.bytes()
            .map(|b| if is_key_byte(b) { b } else { b'_' }),
    );
}

/// Render a non-text key through its textual form, then sanitize it
fn write_value_key(buf: &mut Vec<u8>, key: Value<'_>) {
    let start = buf.len();
    if write!(ByteWriter(buf), "{}", key).is_err() {
        buf.truncate(start);
    }
    if buf.len() == start {
        buf.push(b'_');
        return;
    }
    for b in &mut buf[start..] {
        if !is_key_byte(*b) {
            *b = b'_';
        }
    }
}

fn write_str_value(buf: &mut Vec<u8>, value: &str) {
    let start = buf.len();
    buf.extend_from_slice(value.as_bytes());
    finish_value(buf, start);
}

fn write_value(buf: &mut Vec<u8>, value: Value<'_>) {
    // Only a Display impl reporting its own error can fail here.
    let start = buf.len();
    let result = match value {
        Value::Str(s) => {
            write_str_value(buf, s);
            return;
        }
        Value::Int(i) => write!(ByteWriter(buf), "{}", i),
        Value::Uint(u) => write!(ByteWriter(buf), "{}", u),
        Value::Float(f) => write!(ByteWriter(buf), "{}", f),
        Value::Bool(b) => {
            buf.extend_from_slice(if b { b"true" } else { b"false" });
            return;
        }
        Value::Error(e) => write!(ByteWriter(buf), "{}", e),
        Value::Display(d) => write!(ByteWriter(buf), "{}", d),
        Value::Debug(d) => write!(ByteWriter(buf), "{:?}", d),
    };

    if result.is_err() {
        buf.truncate(start);
        buf.extend_from_slice(BAD_VALUE.as_bytes());
        return;
    }
    finish_value(buf, start);
}

/// Quote the value written since `start` if it would not survive a logfmt
/// reader as-is.
#[inline]
fn finish_value(buf: &mut Vec<u8>, start: usize) {
    if needs_quoting(&buf[start..]) {
        quote_in_place(buf, start);
    }
}

#[inline]
fn needs_quoting(value: &[u8]) -> bool {
    value.is_empty()
        || value
            .iter()
            .any(|&b| b <= b' ' || b == b'=' || b == b'"' || b == 0x7f)
}

/// Escaped form of one byte inside a quoted value
#[inline]
fn escaped(b: u8) -> ([u8; 4], usize) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    match b {
        b'"' => ([b'\\', b'"', 0, 0], 2),
        b'\\' => ([b'\\', b'\\', 0, 0], 2),
        b'\n' => ([b'\\', b'n', 0, 0], 2),
        b'\r' => ([b'\\', b'r', 0, 0], 2),
        b'\t' => ([b'\\', b't', 0, 0], 2),
        0..=0x1f | 0x7f => (
            [b'\\', b'x', HEX[(b >> 4) as usize], HEX[(b & 0xf) as usize]],
            4,
        ),
        _ => ([b, 0, 0, 0], 1),
    }
}

/// Wrap `buf[start..]` in quotes, escaping it back to front so nothing
/// needs a scratch buffer.
fn quote_in_place(buf: &mut Vec<u8>, start: usize) {
    let old_len = buf.len();
    let extra: usize = buf[start..]
        .iter()
        .map(|&b| escaped(b).1 - 1)
        .sum::<usize>()
        + 2;
    buf.resize(old_len + extra, 0);

    // The write cursor never falls behind the read cursor: the gap between
    // them is the escape growth still owed by unread bytes, plus one.
    let mut write = buf.len() - 1;
    buf[write] = b'"';
    let mut read = old_len;
    while read > start {
        read -= 1;
        let (bytes, n) = escaped(buf[read]);
        write -= n;
        buf[write..write + n].copy_from_slice(&bytes[..n]);
    }
    write -= 1;
    buf[write] = b'"';
    debug_assert_eq!(write, start);
}
