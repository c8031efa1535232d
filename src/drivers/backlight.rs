//! PWM backlight driver.
//!
//! Brightness via any `embedded-hal` 1.0 PWM channel, power via a digital
//! enable pin on the LED boost converter.
//!
//! ## Sequencing
//!
//! Power on sets the duty cycle before raising the enable line so the
//! panel never flashes at a stale level.  Power off drops the duty cycle
//! first, then the enable line.
//!
//! Hardware errors are logged and the driver keeps its requested state;
//! the state machine has no recovery path for a stuck PWM channel.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, warn};

use crate::config::MAX_BRIGHTNESS;
use crate::fsm::effects::Brightness;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacklightOutput {
    Off,
    On { brightness: Brightness },
}

pub struct BacklightDriver<P, E> {
    pwm: P,
    enable: E,
    state: BacklightOutput,
    hw_errors: u32,
}

impl<P, E> BacklightDriver<P, E>
where
    P: SetDutyCycle,
    E: OutputPin,
{
    /// Take ownership of the PWM channel and enable pin.  The hardware is
    /// driven to the off state immediately.
    pub fn new(pwm: P, enable: E) -> Self {
        let mut driver = Self {
            pwm,
            enable,
            state: BacklightOutput::Off,
            hw_errors: 0,
        };
        driver.power_off();
        driver
    }

    pub fn power_on(&mut self, brightness: Brightness) {
        let brightness = brightness.min(MAX_BRIGHTNESS);
        self.set_duty_hw(brightness);
        self.set_enable_hw(true);
        self.state = BacklightOutput::On { brightness };
        debug!("Backlight on at {}%", brightness);
    }

    /// Change brightness.  Ignored while the backlight is off.
    pub fn set_brightness(&mut self, brightness: Brightness) {
        let brightness = brightness.min(MAX_BRIGHTNESS);
        match self.state {
            BacklightOutput::On { .. } => {
                self.set_duty_hw(brightness);
                self.state = BacklightOutput::On { brightness };
                debug!("Backlight brightness {}%", brightness);
            }
            BacklightOutput::Off => {
                warn!("Backlight: brightness {}% requested while off", brightness);
            }
        }
    }

    pub fn power_off(&mut self) {
        self.set_duty_hw(0);
        self.set_enable_hw(false);
        self.state = BacklightOutput::Off;
        debug!("Backlight off");
    }

    pub fn state(&self) -> BacklightOutput {
        self.state
    }

    pub fn is_on(&self) -> bool {
        matches!(self.state, BacklightOutput::On { .. })
    }

    /// Number of failed PWM / GPIO writes since construction.
    pub fn hw_errors(&self) -> u32 {
        self.hw_errors
    }

    /// Give the peripherals back.
    pub fn release(self) -> (P, E) {
        (self.pwm, self.enable)
    }

    fn set_duty_hw(&mut self, brightness: Brightness) {
        if let Err(e) = self.pwm.set_duty_cycle_percent(brightness) {
            self.hw_errors = self.hw_errors.saturating_add(1);
            warn!("Backlight: PWM write failed: {:?}", e);
        }
    }

    fn set_enable_hw(&mut self, on: bool) {
        let result = if on {
            self.enable.set_high()
        } else {
            self.enable.set_low()
        };
        if let Err(e) = result {
            self.hw_errors = self.hw_errors.saturating_add(1);
            warn!("Backlight: enable pin write failed: {:?}", e);
        }
    }
}
