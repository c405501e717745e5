//! Main logger implementation

use super::{
    appender::Appender,
    buffer_pool::{BufferPool, PoolStats, DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_RETAINED_CAPACITY},
    caller::{Caller, CallerResolver, LocationResolver},
    config::LoggerConfig,
    encoder::Encoder,
    error::{LoggerError, Result},
    field::{Field, FieldValue, Value},
    level_gate::LevelGate,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    record::LogRecord,
    sink::{panic_message, ErrorCallback, Sink},
    timestamp::TimestampFormat,
};
use crate::appenders::WriterAppender;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe, Location};
use std::sync::Arc;

/// A structured logfmt logger.
///
/// Configuration is fixed at construction except for the minimum level,
/// which can be changed at runtime through a shared reference. A `Logger`
/// is `Send + Sync`; share it across threads with `Arc` or a `static`.
///
/// # Example
///
/// ```
/// use logf::prelude::*;
///
/// let logger = Logger::builder()
///     .writer(std::io::sink())
///     .default_field("component", "logf")
///     .build();
///
/// logger.info("hello world", &["stack".into(), "testing".into()]);
/// ```
pub struct Logger {
    gate: LevelGate,
    encoder: Encoder,
    defaults: Vec<Field>,
    enable_caller: bool,
    caller_skip: usize,
    resolver: Arc<dyn CallerResolver>,
    pool: BufferPool,
    sink: Sink,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger writing plain lines at `info` and above to stdout
    #[must_use]
    #[cfg(feature = "console")]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Build a logger from a validated configuration, writing to stdout
    #[cfg(feature = "console")]
    pub fn from_config(config: LoggerConfig) -> Result<Self> {
        config.validate()?;
        Ok(LoggerBuilder::new().config(config).build())
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Current minimum level
    pub fn level(&self) -> LogLevel {
        self.gate.level()
    }

    /// Change the minimum level; visible to all threads on their next call
    pub fn set_level(&self, level: LogLevel) {
        self.gate.set_level(level);
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.gate.enabled(level)
    }

    /// Write one record at `level`.
    ///
    /// `fields` alternates keys and values. Nothing happens below the
    /// minimum level; write failures never reach the caller.
    #[inline]
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: &str, fields: &[Value<'_>]) {
        if !self.gate.enabled(level) {
            return;
        }
        self.emit(level, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: &str, fields: &[Value<'_>]) {
        self.log(LogLevel::Trace, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Value<'_>]) {
        self.log(LogLevel::Debug, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Value<'_>]) {
        self.log(LogLevel::Info, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Value<'_>]) {
        self.log(LogLevel::Warn, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Value<'_>]) {
        self.log(LogLevel::Error, message, fields);
    }

    /// Logs at `fatal`. The process keeps running.
    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Value<'_>]) {
        self.log(LogLevel::Fatal, message, fields);
    }

    /// Encode and deliver a record that already passed the gate.
    ///
    /// A panic while resolving the caller or encoding (a user `Display`
    /// impl, say) drops the record instead of unwinding into the caller.
    #[inline(never)]
    #[track_caller]
    fn emit(&self, level: LogLevel, message: &str, fields: &[Value<'_>]) {
        let site = Location::caller();
        let mut buf = self.pool.acquire();

        let encoded = catch_unwind(AssertUnwindSafe(|| {
            let mut record = LogRecord::new(level, message, fields);
            if self.enable_caller {
                let caller = self
                    .resolver
                    .resolve(site, self.caller_skip)
                    .unwrap_or_else(Caller::unknown);
                record = record.with_caller(caller);
            }
            self.encoder.encode(&record, &self.defaults, &mut buf);
        }));

        match encoded {
            Ok(()) => self.sink.deliver(buf.as_slice()),
            Err(panic) => self.sink.report(LoggerError::other(format!(
                "encoding panicked: {}",
                panic_message(&*panic)
            ))),
        }
    }

    /// Get the number of records lost to write failures or panics
    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use logf::Logger;
    ///
    /// let logger = Logger::builder().writer(std::io::sink()).build();
    /// logger.info("started", &[]);
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.total_logged(), 1);
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub fn default_fields(&self) -> &[Field] {
        &self.defaults
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        // Report any dropped logs
        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

#[cfg(feature = "console")]
impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use logf::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .writer(std::io::sink())
///     .default_fields(&["component".into(), "logf".into()])
///     .enable_caller(true)
///     .on_write_error(Arc::new(|err: &LoggerError| {
///         eprintln!("ALERT: log write failed: {}", err);
///     }))
///     .build();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    appender: Option<Box<dyn Appender>>,
    resolver: Option<Arc<dyn CallerResolver>>,
    on_error: Option<ErrorCallback>,
    buffer_capacity: usize,
    max_retained_capacity: usize,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            appender: None,
            resolver: None,
            on_error: None,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_retained_capacity: DEFAULT_MAX_RETAINED_CAPACITY,
        }
    }

    /// Replace every plain option with `config`
    ///
    /// Level, default fields, color, caller, skip count, timestamp format and
    /// pool size set by earlier builder calls are discarded, so call this
    /// first and refine with the other methods afterwards. The appender,
    /// resolver and error callback are not part of `LoggerConfig` and
    /// survive.
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Set the output destination
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    /// Write to any `io::Write`, e.g. `std::io::sink()` or a socket
    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Write + Send + 'static>(self, writer: W) -> Self {
        self.appender(WriterAppender::new(writer))
    }

    /// Append alternating key/value pairs to the default fields
    ///
    /// A dangling key gets the `!MISSING` placeholder, as at call sites.
    #[must_use = "builder methods return a new value"]
    pub fn default_fields(mut self, fields: &[Value<'_>]) -> Self {
        self.config.default_fields.extend(Field::pairs_from(fields));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn default_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.config.default_fields.push(Field::new(key, value));
        self
    }

    /// Wrap keys and the level in ANSI colors chosen by level
    #[must_use = "builder methods return a new value"]
    pub fn enable_color(mut self, enable: bool) -> Self {
        self.config.enable_color = enable;
        self
    }

    /// Add a `caller=file:line` field to every record
    #[must_use = "builder methods return a new value"]
    pub fn enable_caller(mut self, enable: bool) -> Self {
        self.config.enable_caller = enable;
        self
    }

    /// Frames skipped by stack-walking resolvers, counted from `Logger::emit`
    #[must_use = "builder methods return a new value"]
    pub fn caller_skip_frame_count(mut self, skip: usize) -> Self {
        self.config.caller_skip_frame_count = skip;
        self
    }

    /// Replace the default `LocationResolver`
    #[must_use = "builder methods return a new value"]
    pub fn caller_resolver<R: CallerResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    /// Set a callback for write failures
    ///
    /// Replaces the rate-limited stderr report. Called once per failed or
    /// panicking write, on the logging thread.
    #[must_use = "builder methods return a new value"]
    pub fn on_write_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Size the buffer pool
    #[must_use = "builder methods return a new value"]
    pub fn buffer_pool(
        mut self,
        max_buffers: usize,
        buffer_capacity: usize,
        max_retained_capacity: usize,
    ) -> Self {
        self.config.max_buffers = max_buffers;
        self.buffer_capacity = buffer_capacity;
        self.max_retained_capacity = max_retained_capacity;
        self
    }

    /// Build the Logger
    ///
    /// Without an appender the logger writes to stdout (or discards output
    /// when the `console` feature is off).
    pub fn build(self) -> Logger {
        let config = self.config;
        let metrics = Arc::new(LoggerMetrics::new());

        let appender = match self.appender {
            Some(appender) => appender,
            None => default_appender(),
        };

        Logger {
            gate: LevelGate::new(config.level),
            encoder: Encoder::new(config.enable_color, config.timestamp_format),
            defaults: config.default_fields,
            enable_caller: config.enable_caller,
            caller_skip: config.caller_skip_frame_count,
            resolver: self.resolver.unwrap_or_else(|| Arc::new(LocationResolver)),
            pool: BufferPool::with_limits(
                config.max_buffers,
                self.buffer_capacity,
                self.max_retained_capacity,
            ),
            sink: Sink::new(appender, Arc::clone(&metrics), self.on_error),
            metrics,
        }
    }
}

#[cfg(feature = "console")]
fn default_appender() -> Box<dyn Appender> {
    Box::new(crate::appenders::ConsoleAppender::new())
}

#[cfg(not(feature = "console"))]
fn default_appender() -> Box<dyn Appender> {
    Box::new(WriterAppender::new(std::io::sink()))
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
