//! Backlight Controller: Host Simulator
//!
//! Drives the real state machine, drivers and adapters on a desktop host.
//! Event codes typed on stdin stand in for the input mapping layer; the
//! software one-shot timer is polled against the host monotonic clock.
//!
//! ```text
//!  stdin thread ──mpsc──▶ main loop ──▶ EventQueue ──▶ AppService
//!                            │                            │
//!                            └── poll(HostClock) ◀── HardwareAdapter
//!                                 (timer expiry)     (Logged PWM / pin)
//! ```
//!
//! Usage: `backlight-sim [config.json]`
#![deny(unused_must_use)]

use std::convert::Infallible;
use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result, bail};
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use log::{info, warn};

// std implementation of the critical section behind the shared service mutex.
use critical_section as _;

use backlight::adapters::hardware::HardwareAdapter;
use backlight::adapters::log_sink::LogEventSink;
use backlight::adapters::time::HostClock;
use backlight::app::service::AppService;
use backlight::config::BacklightConfig;
use backlight::drivers::backlight::BacklightDriver;
use backlight::drivers::timer::OneShotTimer;
use backlight::events::{EventQueue, Signal};
use backlight::fsm::Event;

/// Interval at which the timer is polled while stdin is idle.
const POLL_INTERVAL: StdDuration = StdDuration::from_millis(50);

// ── Host "hardware" ───────────────────────────────────────────

/// PWM channel that logs duty changes instead of driving a pin.
struct LoggedPwm {
    duty: u16,
}

impl pwm::ErrorType for LoggedPwm {
    type Error = Infallible;
}

impl SetDutyCycle for LoggedPwm {
    fn max_duty_cycle(&self) -> u16 {
        1000
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if duty != self.duty {
            info!("HW | pwm duty {} -> {}", self.duty, duty);
            self.duty = duty;
        }
        Ok(())
    }
}

/// Enable line that logs level changes.
struct LoggedPin {
    high: bool,
}

impl digital::ErrorType for LoggedPin {
    type Error = Infallible;
}

impl OutputPin for LoggedPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.high {
            info!("HW | backlight enable LOW");
        }
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            info!("HW | backlight enable HIGH");
        }
        self.high = true;
        Ok(())
    }
}

// ── Input ─────────────────────────────────────────────────────

enum Command {
    Code(u8),
    Status,
    Poll,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "" => Some(Command::Poll),
        "s" => Some(Command::Status),
        "q" => Some(Command::Quit),
        other => other.parse::<u8>().ok().map(Command::Code),
    }
}

fn print_menu() {
    println!("Events:");
    for event in Event::EXTERNAL {
        println!("  {} - {}", event.code(), event);
    }
    println!("  s - status");
    println!("  q - quit");
}

fn load_config() -> Result<BacklightConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            BacklightConfig::from_json(&json).with_context(|| format!("parsing config file {path}"))
        }
        None => Ok(BacklightConfig::default()),
    }
}

// ── Entry point ───────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    info!(
        "Config: warmup={}ms inactivity={}ms shutdown={}ms brightness min/full/dim={}/{}/{}",
        config.warmup_ms,
        config.inactivity_timeout_ms,
        config.shutdown_ms,
        config.min_brightness,
        config.full_brightness,
        config.dim_brightness
    );

    let mut app = AppService::new(config)?;
    let mut hw = HardwareAdapter::new(
        BacklightDriver::new(LoggedPwm { duty: 0 }, LoggedPin { high: false }),
        OneShotTimer::new(),
    );
    let mut sink = LogEventSink::new();
    let mut queue: EventQueue = EventQueue::new();
    let clock = HostClock::new();

    app.start(&mut sink);
    print_menu();

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        let mut quit = false;
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => match parse_command(&line) {
                Some(Command::Code(code)) => {
                    queue.push(Signal::Raw(code));
                }
                Some(Command::Status) => {
                    println!(
                        "state={} permitted={} timer={} remaining={:?} output={:?}",
                        app.state(),
                        app.is_action_permitted(),
                        app.armed_timer()
                            .map_or_else(|| "none".to_string(), |t| t.to_string()),
                        hw.timer_remaining().map(|d| d.as_millis()),
                        hw.output()
                    );
                    println!("stats={:?}", app.stats());
                }
                Some(Command::Poll) => {}
                Some(Command::Quit) => quit = true,
                None => warn!("Unknown input {:?}", line.trim()),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => quit = true,
        }

        if let Some(token) = hw.poll(clock.now()) {
            queue.push(Signal::TimerExpired(token));
        }

        if let Err(e) = app.run_pending(&mut queue, &mut hw, &mut sink) {
            bail!("fatal: {e}");
        }

        if quit {
            info!("Exiting in {}", app.state());
            return Ok(());
        }
    }
}
