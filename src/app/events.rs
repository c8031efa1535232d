//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.

use crate::error::TimerError;
use crate::fsm::effects::TimerToken;
use crate::fsm::{Event, State};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(State),

    /// An event moved the FSM to another state.
    StateChanged { from: State, to: State, event: Event },

    /// An event re-armed the timer of the current state without moving it.
    Refreshed { state: State, event: Event },

    /// An event hit a self-loop with no effects.
    EventIgnored { state: State, event: Event },

    /// A raw code outside the event set was rejected.
    EventRejected(u8),

    /// A timer expiry arrived for a timer the engine no longer owns.
    StaleTimeout(TimerToken),

    /// The timer backend failed; the FSM fell back to `Off`.
    TimerFault(TimerError),
}

/// Running counters kept by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// Deliveries that ran a transition (including self-loops with effects).
    pub applied: u64,
    /// Deliveries that were ignored.
    pub ignored: u64,
    /// Raw codes rejected as invalid.
    pub rejected: u64,
    /// Stale timer expiries dropped.
    pub stale_timeouts: u64,
    /// Timer faults seen.
    pub timer_faults: u64,
}
