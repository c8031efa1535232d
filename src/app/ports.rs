//! Port traits: the hexagonal boundary between the state machine and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Fsm / AppService (domain)
//! ```
//!
//! Driven adapters (backlight hardware, timer backend, event sinks)
//! implement these traits.  The engine consumes them via generics, so the
//! domain core never touches hardware directly.

use embassy_time::Duration;

use crate::error::TimerError;
use crate::fsm::effects::{Brightness, TimerToken};

// ───────────────────────────────────────────────────────────────
// Backlight port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: executes the hardware effects of a transition.
pub trait BacklightPort {
    /// Power the backlight at `brightness` percent.
    fn power_on(&mut self, brightness: Brightness);

    /// Cut backlight power.
    fn power_off(&mut self);

    /// Change brightness of a powered backlight.
    fn set_brightness(&mut self, brightness: Brightness);
}

// ───────────────────────────────────────────────────────────────
// Timer port (driven adapter: domain ↔ timer backend)
// ───────────────────────────────────────────────────────────────

/// Single-shot timer backend.
///
/// Both calls are non-blocking requests.  When an armed timer elapses the
/// backend must hand its token back to
/// [`Fsm::on_timer_expired`](crate::fsm::Fsm::on_timer_expired), directly
/// or through the [`EventQueue`](crate::events::EventQueue).  Expiries that
/// race a cancellation are tolerated: the engine drops tokens it no longer
/// owns.
pub trait TimerPort {
    /// Arm a timer that expires once after `duration`.
    fn arm(&mut self, token: TimerToken, duration: Duration) -> Result<(), TimerError>;

    /// Cancel a previously armed timer.  Cancelling a timer that already
    /// fired is not an error.
    fn cancel(&mut self, token: TimerToken) -> Result<(), TimerError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, debug
/// overlay, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
