//! Runtime minimum-level gate

use super::log_level::LogLevel;
use std::sync::atomic::{AtomicU8, Ordering};

/// Holds the current minimum level of a logger.
///
/// The level is a single atomic byte, so readers on the hot path never
/// observe a torn value and never take a lock.
#[derive(Debug)]
pub struct LevelGate {
    min_level: AtomicU8,
}

impl LevelGate {
    pub const fn new(level: LogLevel) -> Self {
        Self {
            min_level: AtomicU8::new(level.as_u8()),
        }
    }

    /// Whether a record at `level` should be emitted
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.as_u8() >= self.min_level.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: LogLevel) {
        self.min_level.store(level.as_u8(), Ordering::Relaxed);
    }
}

impl Default for LevelGate {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}
