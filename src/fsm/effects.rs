//! Effects returned by transitions.
//!
//! A transition never touches hardware or timers itself; it returns an
//! ordered list of [`Effect`]s and the engine applies them.  The
//! vocabulary is closed: the host only ever has to interpret these five
//! instructions.

use core::fmt;

use embassy_time::Duration;
use heapless::Vec;

/// Most effects a single transition produces.
pub const MAX_EFFECTS: usize = 4;

/// Ordered effect list carried by a [`Transition`](super::states::Transition).
pub type Effects = Vec<Effect, MAX_EFFECTS>;

/// Backlight brightness in percent (0 = dark, 100 = full).
pub type Brightness = u8;

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

/// The three single-shot timers the engine can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Dwell time in `Warmup`.
    Warmup,
    /// Inactivity window in `On`.
    Inactivity,
    /// Dimming period in `Shutdown`.
    Shutdown,
}

impl TimerKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Warmup => "warmup",
            Self::Inactivity => "inactivity",
            Self::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of one arming of a timer.
///
/// The generation increases on every arming, so an expiry that raced a
/// cancellation carries an outdated token and is discarded by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u32,
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.generation)
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// A side-effecting instruction for a host collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Power the backlight hardware at the given brightness.
    PowerOn(Brightness),
    /// Cut backlight power.
    PowerOff,
    /// Change brightness of an already powered backlight.
    SetBrightness(Brightness),
    /// Arm a single-shot timer.
    ArmTimer { kind: TimerKind, duration: Duration },
    /// Cancel the timer of the given kind if it is armed.
    CancelTimer(TimerKind),
}

impl Effect {
    /// Timer effects are applied against the timer port, everything else
    /// against the backlight port.
    pub fn is_timer(&self) -> bool {
        matches!(self, Self::ArmTimer { .. } | Self::CancelTimer(_))
    }
}

/// Build an [`Effects`] list from a fixed-size array.  The length bound is
/// checked at compile time.
pub(crate) fn effects<const N: usize>(list: [Effect; N]) -> Effects {
    const { assert!(N <= MAX_EFFECTS) };
    list.into_iter().collect()
}
