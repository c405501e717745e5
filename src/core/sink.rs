//! Serialized delivery of encoded lines to the configured appender

use super::appender::Appender;
use super::error::{LoggerError, Result};
use super::metrics::LoggerMetrics;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Callback invoked for every failed write, instead of the stderr report
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// The single exclusive section of the pipeline.
///
/// The appender lock is held only for the `append` call itself; encoding
/// happens before `deliver` is reached.
pub struct Sink {
    appender: Mutex<Box<dyn Appender>>,
    metrics: Arc<LoggerMetrics>,
    on_error: Option<ErrorCallback>,
}

impl Sink {
    pub fn new(
        appender: Box<dyn Appender>,
        metrics: Arc<LoggerMetrics>,
        on_error: Option<ErrorCallback>,
    ) -> Self {
        Self {
            appender: Mutex::new(appender),
            metrics,
            on_error,
        }
    }

    /// Hand one complete line to the appender exactly once.
    ///
    /// Never fails the caller: errors and panics are counted as drops and
    /// reported out of band.
    pub fn deliver(&self, line: &[u8]) {
        let result = {
            let mut appender = self.appender.lock();
            catch_unwind(AssertUnwindSafe(|| appender.append(line)))
                .map_err(|panic| (appender.name().to_string(), panic))
        };

        match result {
            Ok(Ok(())) => {
                self.metrics.record_logged(line.len());
            }
            Ok(Err(e)) => self.report(e),
            Err((name, panic)) => {
                self.report(LoggerError::appender_panic(name, panic_message(&*panic)))
            }
        }
    }

    /// Record a line lost before it reached the appender
    pub fn report(&self, error: LoggerError) {
        let previous = self.metrics.record_dropped();

        if let Some(ref callback) = self.on_error {
            // A panicking callback must not take the caller down either.
            let _ = catch_unwind(AssertUnwindSafe(|| callback(&error)));
            return;
        }

        // Alert on first failure and periodically thereafter
        if previous == 0 || (previous + 1).is_multiple_of(1000) {
            match error {
                LoggerError::AppenderPanic { .. } => {
                    eprintln!("[LOGGER CRITICAL] {} ({} records dropped)", error, previous + 1)
                }
                _ => eprintln!(
                    "[LOGGER ERROR] Write failed: {} ({} records dropped)",
                    error,
                    previous + 1
                ),
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        let mut appender = self.appender.lock();
        match catch_unwind(AssertUnwindSafe(|| appender.flush())) {
            Ok(result) => result,
            Err(panic) => Err(LoggerError::appender_panic(
                appender.name().to_string(),
                panic_message(&*panic),
            )),
        }
    }

    pub fn appender_name(&self) -> String {
        self.appender.lock().name().to_string()
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
