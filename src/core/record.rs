//! Log record structure

use super::caller::Caller;
use super::field::Value;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};

/// One log call, alive only while it is being encoded.
///
/// Default fields are not copied in; the encoder writes them ahead of
/// `fields`.
#[derive(Debug)]
pub struct LogRecord<'a> {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: &'a str,
    pub caller: Option<Caller>,
    /// Flat alternating key/value list as passed at the call site
    pub fields: &'a [Value<'a>],
}

impl<'a> LogRecord<'a> {
    pub fn new(level: LogLevel, message: &'a str, fields: &'a [Value<'a>]) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message,
            caller: None,
            fields,
        }
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
