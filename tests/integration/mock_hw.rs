//! Mock hardware adapter for integration tests.
//!
//! Records every backlight and timer call so tests can assert on the full
//! command history without touching real PWM registers or timers.

use std::convert::Infallible;

use backlight::app::events::AppEvent;
use backlight::app::ports::{BacklightPort, EventSink, TimerPort};
use backlight::error::TimerError;
use backlight::fsm::effects::{Brightness, TimerToken};
use embassy_time::Duration;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Arm(TimerToken, Duration),
    Cancel(TimerToken),
    PowerOn(Brightness),
    PowerOff,
    SetBrightness(Brightness),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    /// Tokens the backend currently holds, oldest first.
    pub armed: Vec<TimerToken>,
    /// Error returned by the next `arm` calls while set.
    pub fail_arm: Option<TimerError>,
    /// Error returned by `cancel` while set; the timer stays armed.
    pub fail_cancel: Option<TimerError>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            armed: Vec::new(),
            fail_arm: None,
            fail_cancel: None,
        }
    }

    pub fn last_call(&self) -> Option<&HwCall> {
        self.calls.last()
    }

    /// Let the oldest armed timer elapse and hand back its token.
    pub fn fire(&mut self) -> Option<TimerToken> {
        if self.armed.is_empty() {
            None
        } else {
            Some(self.armed.remove(0))
        }
    }

    pub fn powered(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::PowerOn(_) => Some(true),
                HwCall::PowerOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Most recent brightness commanded while powered.
    pub fn brightness(&self) -> Option<Brightness> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::PowerOn(level) | HwCall::SetBrightness(level) => Some(*level),
            HwCall::PowerOff => Some(0),
            _ => None,
        })
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerPort for MockHardware {
    fn arm(&mut self, token: TimerToken, duration: Duration) -> Result<(), TimerError> {
        if let Some(e) = self.fail_arm {
            return Err(e);
        }
        self.calls.push(HwCall::Arm(token, duration));
        self.armed.push(token);
        Ok(())
    }

    fn cancel(&mut self, token: TimerToken) -> Result<(), TimerError> {
        if let Some(e) = self.fail_cancel {
            return Err(e);
        }
        self.calls.push(HwCall::Cancel(token));
        self.armed.retain(|t| *t != token);
        Ok(())
    }
}

impl BacklightPort for MockHardware {
    fn power_on(&mut self, brightness: Brightness) {
        self.calls.push(HwCall::PowerOn(brightness));
    }

    fn power_off(&mut self) {
        self.calls.push(HwCall::PowerOff);
    }

    fn set_brightness(&mut self, brightness: Brightness) {
        self.calls.push(HwCall::SetBrightness(brightness));
    }
}

// ── Event sink ────────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn has(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Fake peripherals for the driver-level adapter ─────────────

pub struct FakePwm {
    pub duty: u16,
}

impl pwm::ErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        1000
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

pub struct FakePin {
    pub high: bool,
}

impl digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}
