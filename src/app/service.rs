//! Application service: the imperative shell around the FSM.
//!
//! [`AppService`] owns the [`Fsm`] and exposes a hardware-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  EventQueue ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService        │
//!  BacklightPort ◀│  Fsm · stats · config   │
//!  TimerPort     ◀└────────────────────────┘
//! ```

use log::{error, info, warn};

use crate::config::BacklightConfig;
use crate::error::{Error, Result};
use crate::events::{EventQueue, Signal};
use crate::fsm::effects::TimerToken;
use crate::fsm::{Event, Fsm, Outcome, State};

use super::events::{AppEvent, ServiceStats};
use super::ports::{BacklightPort, EventSink, TimerPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    stats: ServiceStats,
}

impl AppService {
    /// Construct the service from a validated configuration.
    pub fn new(config: BacklightConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fsm: Fsm::new(config),
            stats: ServiceStats::default(),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the initial state.  The FSM needs no entry action: `Off`
    /// has no timer and the backlight is assumed unpowered.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {}", self.fsm.current_state());
    }

    // ── Event delivery ────────────────────────────────────────

    /// Deliver a validated event.
    pub fn handle_event<H>(&mut self, event: Event, hw: &mut H, sink: &mut impl EventSink) -> Result<()>
    where
        H: TimerPort + BacklightPort,
    {
        let result = self.fsm.handle_event(event, hw);
        self.record(result, sink)
    }

    /// Decode and deliver a raw event code.
    pub fn handle_raw<H>(&mut self, code: u8, hw: &mut H, sink: &mut impl EventSink) -> Result<()>
    where
        H: TimerPort + BacklightPort,
    {
        let result = self.fsm.handle_raw(code, hw);
        self.record(result, sink)
    }

    /// Route a timer expiry.  Returns `Ok(false)` for a stale token.
    pub fn on_timer_expired<H>(
        &mut self,
        token: TimerToken,
        hw: &mut H,
        sink: &mut impl EventSink,
    ) -> Result<bool>
    where
        H: TimerPort + BacklightPort,
    {
        match self.fsm.on_timer_expired(token, hw) {
            Ok(Some(outcome)) => {
                self.record(Ok(outcome), sink)?;
                Ok(true)
            }
            Ok(None) => {
                self.stats.stale_timeouts += 1;
                sink.emit(&AppEvent::StaleTimeout(token));
                Ok(false)
            }
            Err(e) => self.record(Err(e), sink).map(|()| false),
        }
    }

    /// Single consumer entry for queued signals.
    pub fn dispatch<H>(&mut self, signal: Signal, hw: &mut H, sink: &mut impl EventSink) -> Result<()>
    where
        H: TimerPort + BacklightPort,
    {
        match signal {
            Signal::Raw(code) => self.handle_raw(code, hw, sink),
            Signal::Event(event) => self.handle_event(event, hw, sink),
            Signal::TimerExpired(token) => self.on_timer_expired(token, hw, sink).map(|_| ()),
        }
    }

    /// Drain `queue`, dispatching every signal in order.
    ///
    /// Rejected codes are reported through the sink and do not stop the
    /// drain; a timer fault does, and is returned.  Returns the number of
    /// signals consumed.
    pub fn run_pending<H, const N: usize>(
        &mut self,
        queue: &mut EventQueue<N>,
        hw: &mut H,
        sink: &mut impl EventSink,
    ) -> Result<usize>
    where
        H: TimerPort + BacklightPort,
    {
        let mut consumed = 0;
        while let Some(signal) = queue.pop() {
            consumed += 1;
            match self.dispatch(signal, hw, sink) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(_) => {}
            }
        }
        Ok(consumed)
    }

    // ── Configuration ─────────────────────────────────────────

    /// Hot-reload configuration.  Applies to the next timer arming and the
    /// next brightness change; an armed timer keeps its deadline.
    pub fn update_config(&mut self, config: BacklightConfig) -> Result<()> {
        config.validate()?;
        self.fsm.set_config(config);
        info!("Configuration updated at runtime");
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> State {
        self.fsm.current_state()
    }

    /// Whether user interaction should currently be acted upon.
    pub fn is_action_permitted(&self) -> bool {
        self.fsm.is_action_permitted()
    }

    pub fn armed_timer(&self) -> Option<TimerToken> {
        self.fsm.armed_timer()
    }

    pub fn config(&self) -> &BacklightConfig {
        self.fsm.config()
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats
    }

    // ── Internal ──────────────────────────────────────────────

    fn record(&mut self, result: Result<Outcome>, sink: &mut impl EventSink) -> Result<()> {
        match result {
            Ok(outcome) if outcome.ignored => {
                self.stats.ignored += 1;
                sink.emit(&AppEvent::EventIgnored {
                    state: outcome.from,
                    event: outcome.event,
                });
                Ok(())
            }
            Ok(outcome) => {
                self.stats.applied += 1;
                if outcome.changed_state() {
                    sink.emit(&AppEvent::StateChanged {
                        from: outcome.from,
                        to: outcome.to,
                        event: outcome.event,
                    });
                } else {
                    sink.emit(&AppEvent::Refreshed {
                        state: outcome.to,
                        event: outcome.event,
                    });
                }
                Ok(())
            }
            Err(Error::InvalidEvent(code)) => {
                self.stats.rejected += 1;
                sink.emit(&AppEvent::EventRejected(code));
                Err(Error::InvalidEvent(code))
            }
            Err(Error::TimerFault(fault)) => {
                self.stats.timer_faults += 1;
                error!("AppService: timer fault ({}), backlight forced off", fault);
                sink.emit(&AppEvent::TimerFault(fault));
                Err(Error::TimerFault(fault))
            }
            Err(e) => {
                warn!("AppService: {}", e);
                Err(e)
            }
        }
    }
}
