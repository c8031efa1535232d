//! Transition table.
//!
//! A pure, total mapping from `(State, Event)` to the next state plus the
//! effects the engine must apply.  Pairs without a row are self-loops with
//! no effects.  Exhaustiveness is checked by the compiler: the match has no
//! wildcard over states, so adding a state or event breaks the build until
//! the table is extended.
//!
//! ```text
//!            SystemStart              Timeout
//!   OFF ─────────────────▶ WARMUP ───────────────▶ ON ◀──┐ UserAction
//!    ▲                                            │  └───┘ (restart timer)
//!    │                              UserInactive  │
//!    │                              or Timeout    ▼
//!    └─────────────── Timeout ─────────────── SHUTDOWN
//!                                                 │
//!                       ON ◀──── UserAction ──────┘
//! ```
//!
//! Timer effects come before hardware effects in every row, so a timer
//! fault is seen before the hardware is asked to change.

use super::effects::{effects, Effect, Effects, TimerKind};
use super::{Event, State};
use crate::config::BacklightConfig;

/// Outcome of one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub to: State,
    pub effects: Effects,
}

impl Transition {
    /// Self-loop with no effects (ignored event).
    pub fn stay(state: State) -> Self {
        Self {
            to: state,
            effects: Effects::new(),
        }
    }

    /// `true` if the event was ignored.
    pub fn is_ignored(&self, from: State) -> bool {
        self.to == from && self.effects.is_empty()
    }
}

/// Look up the transition for `event` in `state`.
///
/// Durations and brightness levels come from `config`; the function has
/// no other inputs and no side effects.
pub fn transition(state: State, event: Event, config: &BacklightConfig) -> Transition {
    match (state, event) {
        // ── Off ──────────────────────────────────────────────
        (State::Off, Event::SystemStart) => Transition {
            to: State::Warmup,
            effects: effects([
                Effect::ArmTimer {
                    kind: TimerKind::Warmup,
                    duration: config.warmup(),
                },
                Effect::PowerOn(config.min_brightness),
            ]),
        },
        // Device not started.
        (State::Off, Event::UserAction | Event::UserInactive | Event::Timeout) => {
            Transition::stay(state)
        }

        // ── Warmup ───────────────────────────────────────────
        (State::Warmup, Event::Timeout) => Transition {
            to: State::On,
            effects: effects([
                Effect::ArmTimer {
                    kind: TimerKind::Inactivity,
                    duration: config.inactivity_timeout(),
                },
                Effect::SetBrightness(config.full_brightness),
            ]),
        },
        // Warmup is not interruptible.
        (State::Warmup, Event::SystemStart | Event::UserAction | Event::UserInactive) => {
            Transition::stay(state)
        }

        // ── On ───────────────────────────────────────────────
        (State::On, Event::UserAction) => Transition {
            to: State::On,
            effects: effects([
                Effect::CancelTimer(TimerKind::Inactivity),
                Effect::ArmTimer {
                    kind: TimerKind::Inactivity,
                    duration: config.inactivity_timeout(),
                },
            ]),
        },
        (State::On, Event::UserInactive) => Transition {
            to: State::Shutdown,
            effects: effects([
                Effect::CancelTimer(TimerKind::Inactivity),
                Effect::ArmTimer {
                    kind: TimerKind::Shutdown,
                    duration: config.shutdown(),
                },
                Effect::SetBrightness(config.dim_brightness),
            ]),
        },
        // Inactivity window elapsed: same path as an explicit UserInactive,
        // minus the cancel (the timer already fired).
        (State::On, Event::Timeout) => Transition {
            to: State::Shutdown,
            effects: effects([
                Effect::ArmTimer {
                    kind: TimerKind::Shutdown,
                    duration: config.shutdown(),
                },
                Effect::SetBrightness(config.dim_brightness),
            ]),
        },
        (State::On, Event::SystemStart) => Transition::stay(state),

        // ── Shutdown ─────────────────────────────────────────
        (State::Shutdown, Event::UserAction) => Transition {
            to: State::On,
            effects: effects([
                Effect::CancelTimer(TimerKind::Shutdown),
                Effect::ArmTimer {
                    kind: TimerKind::Inactivity,
                    duration: config.inactivity_timeout(),
                },
                Effect::SetBrightness(config.full_brightness),
            ]),
        },
        (State::Shutdown, Event::Timeout) => Transition {
            to: State::Off,
            effects: effects([Effect::PowerOff]),
        },
        (State::Shutdown, Event::SystemStart | Event::UserInactive) => Transition::stay(state),
    }
}
