//! Unified error types for the backlight controller.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! host's event loop handles failures uniformly.  All variants are `Copy`
//! so they can be passed through the engine, the shared service and the
//! event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Raw event code outside the closed event set.  Recovered locally:
    /// the engine state is left unchanged.
    InvalidEvent(u8),
    /// The timer backend could not arm or cancel a timer.  Fatal: the
    /// auto-off guarantee can no longer be upheld.
    TimerFault(TimerError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl Error {
    /// Whether the host must treat this error as fatal.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TimerFault(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEvent(code) => write!(f, "invalid event code {code}"),
            Self::TimerFault(e) => write!(f, "timer fault: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Timer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// No free timer slot (resource exhaustion).
    NoFreeSlot,
    /// `now + duration` does not fit the backend's time base.
    DeadlineOverflow,
    /// The backend refused the request.
    Backend(&'static str),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFreeSlot => write!(f, "no free timer slot"),
            Self::DeadlineOverflow => write!(f, "deadline overflow"),
            Self::Backend(msg) => write!(f, "backend: {msg}"),
        }
    }
}

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Self::TimerFault(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
