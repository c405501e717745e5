//! Appender trait for log output destinations

use super::error::Result;

/// A destination for encoded log lines.
///
/// `append` receives one complete, newline-terminated record. The logger
/// serializes calls, so implementations need no locking of their own.
pub trait Appender: Send {
    fn append(&mut self, line: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
