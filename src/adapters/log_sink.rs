//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (UART / RTT on a device, stderr in the simulator).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={}", state);
            }
            AppEvent::StateChanged { from, to, event } => {
                info!("STATE | {} -> {} on {}", from, to, event);
            }
            AppEvent::Refreshed { state, event } => {
                info!("STATE | {} refreshed by {}", state, event);
            }
            AppEvent::EventIgnored { state, event } => {
                info!("EVENT | {} ignored in {}", event, state);
            }
            AppEvent::EventRejected(code) => {
                warn!("EVENT | rejected code {}", code);
            }
            AppEvent::StaleTimeout(token) => {
                info!("TIMER | stale {} dropped", token);
            }
            AppEvent::TimerFault(fault) => {
                warn!("TIMER | fault: {}", fault);
            }
        }
    }
}
