//! Appender implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod writer;

#[cfg(feature = "console")]
pub use console::{ConsoleAppender, ConsoleTarget};
#[cfg(feature = "file")]
pub use file::FileAppender;
pub use writer::WriterAppender;

pub use crate::core::Appender;
