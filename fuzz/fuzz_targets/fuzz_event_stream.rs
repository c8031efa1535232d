//! Fuzz target: `AppService` event stream
//!
//! Interprets each input byte as either a raw event code or a timer
//! expiry, and asserts that the state machine never panics and that the
//! armed timer always matches the state.
//!
//! cargo fuzz run fuzz_event_stream

#![no_main]

use backlight::app::events::AppEvent;
use backlight::app::ports::{BacklightPort, EventSink, TimerPort};
use backlight::app::service::AppService;
use backlight::config::BacklightConfig;
use backlight::error::TimerError;
use backlight::fsm::State;
use backlight::fsm::effects::TimerToken;
use embassy_time::Duration;
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Host {
    armed: Vec<TimerToken>,
    /// Tokens that fired but have not been delivered yet.
    fired: Vec<TimerToken>,
    powered: bool,
}

impl TimerPort for Host {
    fn arm(&mut self, token: TimerToken, _duration: Duration) -> Result<(), TimerError> {
        self.armed.push(token);
        Ok(())
    }

    fn cancel(&mut self, token: TimerToken) -> Result<(), TimerError> {
        self.armed.retain(|t| *t != token);
        Ok(())
    }
}

impl BacklightPort for Host {
    fn power_on(&mut self, _brightness: u8) {
        self.powered = true;
    }

    fn power_off(&mut self) {
        self.powered = false;
    }

    fn set_brightness(&mut self, _brightness: u8) {}
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut app) = AppService::new(BacklightConfig::default()) else {
        return;
    };
    let mut host = Host::default();

    for &byte in data {
        match byte >> 6 {
            // Let the armed timer elapse; delivery may come later.
            0 => host.fired.extend(host.armed.drain(..)),
            // Deliver the oldest fired token, possibly stale by now.
            1 => {
                if !host.fired.is_empty() {
                    let token = host.fired.remove(0);
                    let _ = app.on_timer_expired(token, &mut host, &mut NullSink);
                }
            }
            _ => {
                let _ = app.handle_raw(byte & 0x3f, &mut host, &mut NullSink);
            }
        }

        assert!(host.armed.len() <= 1, "layered timers");
        assert_eq!(app.armed_timer().map(|t| t.kind), app.state().timer_kind());
        assert_eq!(host.powered, app.state() != State::Off);
    }
});
