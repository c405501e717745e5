//! Core logger types and traits

pub mod appender;
pub mod buffer_pool;
pub mod caller;
pub mod config;
pub mod encoder;
pub mod error;
pub mod field;
pub mod level_gate;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod sink;
pub mod timestamp;

pub use appender::Appender;
pub use buffer_pool::{BufferPool, PoolStats, PooledBuffer};
pub use caller::{BacktraceResolver, Caller, CallerResolver, LocationResolver, DEFAULT_CALLER_SKIP};
pub use config::LoggerConfig;
pub use encoder::{Encoder, BAD_VALUE};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue, Value, MISSING_VALUE};
pub use level_gate::LevelGate;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use record::LogRecord;
pub use sink::{ErrorCallback, Sink};
pub use timestamp::TimestampFormat;
