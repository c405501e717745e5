//! Serializable logger configuration

use super::caller::DEFAULT_CALLER_SKIP;
use super::error::{LoggerError, Result};
use super::field::Field;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The plain options of a `Logger`, loadable from JSON.
///
/// Anything that is not data (the output appender, the caller resolver, the
/// error callback) is set on `LoggerBuilder` instead.
///
/// # Example
///
/// ```
/// use logf::{LoggerConfig, LogLevel};
///
/// let config = LoggerConfig::from_json(r#"{
///     "level": "debug",
///     "enable_caller": true,
///     "default_fields": [{ "key": "component", "value": "logf" }]
/// }"#).unwrap();
///
/// assert_eq!(config.level, LogLevel::Debug);
/// assert_eq!(config.default_fields[0].key, "component");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub enable_color: bool,
    pub enable_caller: bool,
    pub caller_skip_frame_count: usize,
    pub timestamp_format: TimestampFormat,
    pub default_fields: Vec<Field>,
    pub max_buffers: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            enable_color: false,
            enable_caller: false,
            caller_skip_frame_count: DEFAULT_CALLER_SKIP,
            timestamp_format: TimestampFormat::default(),
            default_fields: Vec::new(),
            max_buffers: super::buffer_pool::DEFAULT_MAX_BUFFERS,
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger config",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject option combinations the logger cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.max_buffers == 0 {
            return Err(LoggerError::config("max_buffers", "must be at least 1"));
        }
        if self.default_fields.iter().any(|f| f.key.is_empty()) {
            return Err(LoggerError::config("default_fields", "keys must not be empty"));
        }
        Ok(())
    }
}
