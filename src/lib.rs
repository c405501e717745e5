//! # logf
//!
//! A fast structured logger writing one logfmt line per record.
//!
//! ```text
//! timestamp=2025-01-08T10:30:45.123Z level=info message="hello world" stack=testing
//! ```
//!
//! ## Features
//!
//! - **Cheap when disabled**: the level check is one atomic load, before any
//!   allocation or formatting
//! - **Pooled buffers**: records are encoded into reused buffers, so steady
//!   state logging does not allocate
//! - **Thread Safe**: one `Logger` can be shared by any number of threads;
//!   lines are never interleaved
//! - **Optional decoration**: call-site capture and per-level ANSI colors
//!
//! ```
//! use logf::prelude::*;
//!
//! let logger = Logger::builder()
//!     .writer(std::io::sink())
//!     .default_fields(&["component".into(), "logf".into()])
//!     .build();
//!
//! logger.info("hello world", &["stack".into(), "testing".into()]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::WriterAppender;
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    #[cfg(feature = "file")]
    pub use crate::appenders::FileAppender;
    pub use crate::core::{
        Appender, CallerResolver, ErrorCallback, Field, FieldValue, LogLevel, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result, TimestampFormat, Value,
    };
}

pub use appenders::WriterAppender;
#[cfg(feature = "console")]
pub use appenders::ConsoleAppender;
#[cfg(feature = "file")]
pub use appenders::FileAppender;
pub use self::core::{
    Appender, BacktraceResolver, Caller, CallerResolver, ErrorCallback, Field, FieldValue,
    LocationResolver, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    PoolStats, Result, TimestampFormat, Value, DEFAULT_CALLER_SKIP,
};
