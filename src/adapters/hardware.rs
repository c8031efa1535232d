//! Hardware adapter: bridges the drivers to domain port traits.
//!
//! Owns the [`BacklightDriver`] and the [`OneShotTimer`], exposing them
//! through [`BacklightPort`] and [`TimerPort`].  The main loop polls it for
//! elapsed timers and routes the returned token back into the service.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::{BacklightPort, TimerPort};
use crate::drivers::backlight::{BacklightDriver, BacklightOutput};
use crate::drivers::timer::OneShotTimer;
use crate::error::TimerError;
use crate::fsm::effects::{Brightness, TimerToken};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P, E> {
    backlight: BacklightDriver<P, E>,
    timer: OneShotTimer,
}

impl<P, E> HardwareAdapter<P, E>
where
    P: SetDutyCycle,
    E: OutputPin,
{
    pub fn new(backlight: BacklightDriver<P, E>, timer: OneShotTimer) -> Self {
        Self { backlight, timer }
    }

    /// Advance the timer to `now`; returns the token of an elapsed timer.
    pub fn poll(&mut self, now: Instant) -> Option<TimerToken> {
        self.timer.poll(now)
    }

    pub fn output(&self) -> BacklightOutput {
        self.backlight.state()
    }

    pub fn timer_remaining(&self) -> Option<Duration> {
        self.timer.remaining()
    }
}

// ── BacklightPort implementation ──────────────────────────────

impl<P, E> BacklightPort for HardwareAdapter<P, E>
where
    P: SetDutyCycle,
    E: OutputPin,
{
    fn power_on(&mut self, brightness: Brightness) {
        self.backlight.power_on(brightness);
    }

    fn power_off(&mut self) {
        self.backlight.power_off();
    }

    fn set_brightness(&mut self, brightness: Brightness) {
        self.backlight.set_brightness(brightness);
    }
}

// ── TimerPort implementation ──────────────────────────────────

impl<P, E> TimerPort for HardwareAdapter<P, E>
where
    P: SetDutyCycle,
    E: OutputPin,
{
    fn arm(&mut self, token: TimerToken, duration: Duration) -> Result<(), TimerError> {
        self.timer.arm(token, duration)
    }

    fn cancel(&mut self, token: TimerToken) -> Result<(), TimerError> {
        self.timer.cancel(token);
        Ok(())
    }
}
