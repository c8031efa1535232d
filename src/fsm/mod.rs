//! Backlight finite state machine engine.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  Fsm                                                           │
//! │                                                                │
//! │   handle_event(e) ──┐                                          │
//! │   handle_raw(code) ─┼─▶ states::transition(state, e, config)   │
//! │   on_timer_expired ─┘              │                           │
//! │   (token check)                    ▼                           │
//! │                          Effects, applied in order:            │
//! │                          ArmTimer / CancelTimer ─▶ TimerPort   │
//! │                          PowerOn / SetBrightness /             │
//! │                          PowerOff               ─▶ BacklightPort│
//! │                                    │                           │
//! │                                    ▼                           │
//! │                            commit next state                   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition, including timer expiries, goes through the same
//! `step` path.  The engine owns at most one armed timer and tags each
//! arming with a generation so a late expiry of a cancelled timer is
//! recognised and dropped.

pub mod effects;
pub mod states;

use core::fmt;

use log::{debug, error, info, warn};

use crate::app::ports::{BacklightPort, TimerPort};
use crate::config::BacklightConfig;
use crate::error::{Error, Result, TimerError};
use effects::{Effect, TimerKind, TimerToken};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Operating modes of the backlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum State {
    Warmup = 0,
    On = 1,
    Shutdown = 2,
    Off = 3,
}

impl State {
    /// Total number of states.
    pub const COUNT: usize = 4;

    /// Every state, in discriminant order.
    pub const ALL: [State; Self::COUNT] = [Self::Warmup, Self::On, Self::Shutdown, Self::Off];

    /// State the engine starts in.
    pub const INITIAL: State = State::Off;

    pub const fn name(self) -> &'static str {
        match self {
            Self::Warmup => "Warmup",
            Self::On => "On",
            Self::Shutdown => "Shutdown",
            Self::Off => "Off",
        }
    }

    /// The timer that must be armed while in this state, if any.
    pub const fn timer_kind(self) -> Option<TimerKind> {
        match self {
            Self::Warmup => Some(TimerKind::Warmup),
            Self::On => Some(TimerKind::Inactivity),
            Self::Shutdown => Some(TimerKind::Shutdown),
            Self::Off => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Event identity
// ---------------------------------------------------------------------------

/// Stimuli the engine reacts to.  `Timeout` is synthesised by the engine
/// when its armed timer expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Event {
    SystemStart = 0,
    UserAction = 1,
    UserInactive = 2,
    Timeout = 3,
}

impl Event {
    /// Total number of events.
    pub const COUNT: usize = 4;

    /// Every event, in code order.
    pub const ALL: [Event; Self::COUNT] = [
        Self::SystemStart,
        Self::UserAction,
        Self::UserInactive,
        Self::Timeout,
    ];

    /// Events an external mapping layer may produce.
    pub const EXTERNAL: [Event; 3] = [Self::SystemStart, Self::UserAction, Self::UserInactive];

    /// Raw wire code of this event.
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::SystemStart => "SystemStart",
            Self::UserAction => "UserAction",
            Self::UserInactive => "UserInactive",
            Self::Timeout => "Timeout",
        }
    }
}

impl TryFrom<u8> for Event {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::SystemStart),
            1 => Ok(Self::UserAction),
            2 => Ok(Self::UserInactive),
            3 => Ok(Self::Timeout),
            _ => Err(Error::InvalidEvent(code)),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Outcome of one delivery
// ---------------------------------------------------------------------------

/// What a single event delivery did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub event: Event,
    pub from: State,
    pub to: State,
    /// The event hit a self-loop with no effects.
    pub ignored: bool,
}

impl Outcome {
    pub fn changed_state(&self) -> bool {
        self.from != self.to
    }
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The backlight state machine.
///
/// All mutation goes through `&mut self`, so a single owner serialises
/// event delivery and timer expiry.  Hosts with concurrent producers
/// funnel them through [`SharedService`](crate::app::shared::SharedService)
/// or an [`EventQueue`](crate::events::EventQueue).
#[derive(Debug, Clone)]
pub struct Fsm {
    state: State,
    config: BacklightConfig,
    /// The one timer the engine currently owns.
    armed: Option<TimerToken>,
    /// Generation of the most recent arming (wraps).
    generation: u32,
}

impl Fsm {
    /// Construct an engine in [`State::INITIAL`] with no timer armed.
    pub fn new(config: BacklightConfig) -> Self {
        Self {
            state: State::INITIAL,
            config,
            armed: None,
            generation: 0,
        }
    }

    /// Read-only snapshot of the current state.
    pub fn current_state(&self) -> State {
        self.state
    }

    /// `true` only while the backlight is fully on; collaborators use it to
    /// decide whether a touch counts as valid input.
    pub fn is_action_permitted(&self) -> bool {
        self.state == State::On
    }

    /// Token of the armed timer, if any.
    pub fn armed_timer(&self) -> Option<TimerToken> {
        self.armed
    }

    pub fn config(&self) -> &BacklightConfig {
        &self.config
    }

    /// Replace the configuration.  Takes effect on the next arming; an
    /// armed timer keeps its deadline.
    pub(crate) fn set_config(&mut self, config: BacklightConfig) {
        self.config = config;
    }

    /// Deliver an event.
    ///
    /// A `Timeout` delivered here consumes whatever timer is armed, as if
    /// it had fired.  On a timer fault the engine falls back to `Off` with
    /// the backlight powered down and returns [`Error::TimerFault`].
    pub fn handle_event<H>(&mut self, event: Event, host: &mut H) -> Result<Outcome>
    where
        H: TimerPort + BacklightPort,
    {
        if event == Event::Timeout {
            if let Some(token) = self.armed.take() {
                if let Err(e) = host.cancel(token) {
                    return Err(self.fail_safe(e, host));
                }
            }
        }
        self.step(event, host)
    }

    /// Decode and deliver a raw event code.  Unknown codes are rejected
    /// with [`Error::InvalidEvent`] and leave the engine untouched.
    pub fn handle_raw<H>(&mut self, code: u8, host: &mut H) -> Result<Outcome>
    where
        H: TimerPort + BacklightPort,
    {
        let event = Event::try_from(code).inspect_err(|_| {
            warn!("FSM: rejected event code {} in {}", code, self.state);
        })?;
        self.handle_event(event, host)
    }

    /// Called by the timer backend when `token` expires.
    ///
    /// Returns `Ok(None)` if the token is stale: the timer was cancelled or
    /// re-armed after this expiry was scheduled.
    pub fn on_timer_expired<H>(&mut self, token: TimerToken, host: &mut H) -> Result<Option<Outcome>>
    where
        H: TimerPort + BacklightPort,
    {
        if self.armed != Some(token) {
            warn!(
                "FSM: stale timer {} ignored (armed: {:?}, state {})",
                token, self.armed, self.state
            );
            return Ok(None);
        }
        self.armed = None;
        self.step(Event::Timeout, host).map(Some)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn step<H>(&mut self, event: Event, host: &mut H) -> Result<Outcome>
    where
        H: TimerPort + BacklightPort,
    {
        let from = self.state;
        let transition = states::transition(from, event, &self.config);

        if transition.is_ignored(from) {
            debug!("FSM: {} ignored in {}", event, from);
            return Ok(Outcome {
                event,
                from,
                to: from,
                ignored: true,
            });
        }

        for effect in &transition.effects {
            if let Err(e) = self.apply(*effect, host) {
                return Err(self.fail_safe(e, host));
            }
        }

        self.state = transition.to;
        debug_assert_eq!(
            self.armed.map(|t| t.kind),
            self.state.timer_kind(),
            "timer status out of step with state"
        );

        if from == self.state {
            debug!("FSM: {} in {} (timer {:?})", event, from, self.armed);
        } else {
            info!("FSM transition: {} -> {} on {}", from, self.state, event);
        }

        Ok(Outcome {
            event,
            from,
            to: self.state,
            ignored: false,
        })
    }

    fn apply<H>(&mut self, effect: Effect, host: &mut H) -> core::result::Result<(), TimerError>
    where
        H: TimerPort + BacklightPort,
    {
        match effect {
            Effect::ArmTimer { kind, duration } => {
                // Never layer timers: drop the previous one first.
                if let Some(previous) = self.armed.take() {
                    host.cancel(previous)?;
                }
                self.generation = self.generation.wrapping_add(1);
                let token = TimerToken {
                    kind,
                    generation: self.generation,
                };
                host.arm(token, duration)?;
                self.armed = Some(token);
            }
            Effect::CancelTimer(kind) => {
                if let Some(token) = self.armed.filter(|t| t.kind == kind) {
                    host.cancel(token)?;
                    self.armed = None;
                }
            }
            Effect::PowerOn(level) => host.power_on(level),
            Effect::SetBrightness(level) => host.set_brightness(level),
            Effect::PowerOff => host.power_off(),
        }
        Ok(())
    }

    /// Put the device in the untimed `Off` state after a timer fault so
    /// the backlight cannot stay lit without inactivity protection.
    fn fail_safe<H>(&mut self, fault: TimerError, host: &mut H) -> Error
    where
        H: TimerPort + BacklightPort,
    {
        error!("FSM: timer fault in {}: {} - forcing Off", self.state, fault);
        if let Some(token) = self.armed.take() {
            if let Err(e) = host.cancel(token) {
                warn!("FSM: could not cancel {} during fail-safe: {}", token, e);
            }
        }
        host.power_off();
        self.state = State::Off;
        Error::TimerFault(fault)
    }
}
