//! Logging macros for structured call sites.
//!
//! Each field argument is converted with `Value::from` where the macro is
//! invoked, so strings, integers, floats and booleans can be passed as-is.
//! Errors and other types go through `Value::error`, `Value::display` or
//! `Value::debug`.
//!
//! # Examples
//!
//! ```
//! use logf::prelude::*;
//! use logf::{error, info};
//!
//! let logger = Logger::builder().writer(std::io::sink()).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With fields
//! let port = 8080;
//! info!(logger, "listening", "port", port, "tls", false);
//!
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "fake error");
//! error!(logger, "request failed", "error", &err);
//! ```

/// Log a message with fields at a runtime level.
///
/// # Examples
///
/// ```
/// # use logf::prelude::*;
/// # let logger = Logger::builder().writer(std::io::sink()).build();
/// use logf::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "request failed", "status", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr $(, $field:expr)* $(,)?) => {
        $logger.log($level, $msg, &[$($crate::Value::from($field)),*])
    };
}

/// Log a trace-level message.
///
/// ```
/// # use logf::prelude::*;
/// # let logger = Logger::builder().min_level(LogLevel::Trace).writer(std::io::sink()).build();
/// use logf::trace;
/// trace!(logger, "entering", "fn", "calculate");
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use logf::prelude::*;
/// # let logger = Logger::builder().writer(std::io::sink()).build();
/// use logf::info;
/// info!(logger, "hello world", "stack", "testing");
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message. Does not exit the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
