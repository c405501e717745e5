//! Call-site resolution for log records
//!
//! The level methods on `Logger` are `#[track_caller]`, so the location of
//! the user's call is available for free. A `CallerResolver` turns that
//! location (or a stack walk) into the `caller=file:line` field.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Frames from `Logger::emit` up to the user's call site: `emit`,
/// `Logger::log`, the level method. Calling `Logger::log` directly needs
/// one less; each plain (untracked) wrapper needs one more.
pub const DEFAULT_CALLER_SKIP: usize = 3;

/// Source location of a log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl Caller {
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
        }
    }

    /// Placeholder emitted when resolution fails
    pub fn unknown() -> Self {
        Self {
            file: Cow::Borrowed("unknown"),
            line: 0,
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Resolves the call site of a log record.
///
/// `site` is the location tracked through `#[track_caller]`; `skip` is the
/// configured caller-skip frame count. Returning `None` makes the encoder
/// emit a placeholder caller.
pub trait CallerResolver: Send + Sync {
    fn resolve(&self, site: &'static Location<'static>, skip: usize) -> Option<Caller>;
}

/// Reports the `#[track_caller]` location. Wrappers that are themselves
/// `#[track_caller]` are skipped by the compiler, so `skip` is unused.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationResolver;

impl CallerResolver for LocationResolver {
    #[inline]
    fn resolve(&self, site: &'static Location<'static>, _skip: usize) -> Option<Caller> {
        Some(Caller::from_location(site))
    }
}

/// Walks the captured stack and reports the frame `skip` levels above
/// `Logger::emit`.
///
/// Counting starts at `emit` so the `catch_unwind` machinery between the
/// resolver and the logger does not shift the result. When no `emit` frame
/// is found (the resolver was called directly) counting starts at the
/// resolver's own frame.
///
/// Stack capture is expensive and depends on debug info being present;
/// frames may also disappear under inlining, in which case the skip count
/// has to be tuned for the build profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceResolver;

impl CallerResolver for BacktraceResolver {
    #[inline(never)]
    fn resolve(&self, _site: &'static Location<'static>, skip: usize) -> Option<Caller> {
        let rendered = Backtrace::force_capture().to_string();
        let frames = parse_frames(&rendered);
        let (file, line) = select_frame(&frames, skip)?;

        Some(Caller {
            file: Cow::Owned(file.strip_prefix("./").unwrap_or(file).to_string()),
            line,
        })
    }
}

/// Location of the frame `skip` levels above the anchor frame
fn select_frame<'a>(frames: &[Frame<'a>], skip: usize) -> Option<(&'a str, u32)> {
    let anchor = frames
        .iter()
        .position(|frame| is_emit(frame.symbol))
        .or_else(|| frames.iter().position(|frame| is_resolver(frame.symbol)))?;
    frames.get(anchor + skip)?.location
}

fn is_emit(symbol: &str) -> bool {
    let symbol = strip_hash(symbol);
    symbol.ends_with("logger::Logger::emit") || symbol.ends_with("logger::Logger>::emit")
}

fn is_resolver(symbol: &str) -> bool {
    let symbol = strip_hash(symbol);
    symbol.contains("BacktraceResolver") && symbol.ends_with("::resolve")
}

struct Frame<'a> {
    symbol: &'a str,
    location: Option<(&'a str, u32)>,
}

/// Parse the `Display` output of `std::backtrace::Backtrace`:
///
/// ```text
///    3: crate::module::function
///              at ./src/module.rs:42:9
/// ```
fn parse_frames(rendered: &str) -> Vec<Frame<'_>> {
    let mut frames: Vec<Frame<'_>> = Vec::new();

    for line in rendered.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                if frame.location.is_none() {
                    frame.location = parse_location(location);
                }
            }
            continue;
        }

        if let Some((index, symbol)) = line.split_once(": ") {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                frames.push(Frame {
                    symbol: symbol.trim(),
                    location: None,
                });
            }
        }
    }

    frames
}

/// Drop the `::h0123456789abcdef` suffix of a legacy-mangled symbol
fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::h") {
        Some((path, hash))
            if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) =>
        {
            path
        }
        _ => symbol,
    }
}

/// `path:line:column` → `(path, line)`
fn parse_location(location: &str) -> Option<(&str, u32)> {
    let (rest, _column) = location.rsplit_once(':')?;
    let (file, line) = rest.rsplit_once(':')?;
    Some((file, line.parse().ok()?))
}
