//! Shared helpers for the integration test binaries

#![allow(dead_code)]

use logf::{Appender, LoggerError, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// `io::Write` collecting everything into a shared buffer
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.0.lock().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.bytes()).expect("log output is utf-8")
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Appender that fails every write
pub struct FailingAppender;

impl Appender for FailingAppender {
    fn append(&mut self, _line: &[u8]) -> Result<()> {
        Err(LoggerError::writer("sink unavailable"))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Appender that panics on every write
pub struct PanickingAppender;

impl Appender for PanickingAppender {
    fn append(&mut self, _line: &[u8]) -> Result<()> {
        panic!("appender exploded");
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// Remove `ESC[...m` color sequences
pub fn strip_ansi(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Minimal logfmt reader: splits `key=value` pairs, honoring quoted
/// values and the escapes the encoder emits.
pub fn parse_logfmt(line: &str) -> Vec<(String, String)> {
    let bytes = line.trim_end_matches('\n').as_bytes();
    let mut pairs = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && bytes[i] == b' ' {
            i += 1;
        }
        let key_start = i;
        while i < bytes.len() && bytes[i] != b'=' {
            i += 1;
        }
        let key = String::from_utf8_lossy(&bytes[key_start..i]).into_owned();
        i += 1;

        let mut value = Vec::new();
        if i < bytes.len() && bytes[i] == b'"' {
            i += 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' && i + 1 < bytes.len() {
                    i += 1;
                    match bytes[i] {
                        b'n' => value.push(b'\n'),
                        b'r' => value.push(b'\r'),
                        b't' => value.push(b'\t'),
                        b'x' if i + 2 < bytes.len() => {
                            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap_or("3f");
                            value.push(u8::from_str_radix(hex, 16).unwrap_or(b'?'));
                            i += 2;
                        }
                        other => value.push(other),
                    }
                } else {
                    value.push(bytes[i]);
                }
                i += 1;
            }
            i += 1;
        } else {
            while i < bytes.len() && bytes[i] != b' ' {
                value.push(bytes[i]);
                i += 1;
            }
        }

        pairs.push((key, String::from_utf8_lossy(&value).into_owned()));
    }

    pairs
}

/// Value of the first occurrence of `key`
pub fn field<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
