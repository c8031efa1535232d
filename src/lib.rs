//! Backlight controller library.
//!
//! A finite state machine deciding when a display backlight warms up, is
//! fully on, dims for shutdown, or is off, driven by system lifecycle and
//! user interaction events plus its own single-shot timers.
//!
//! - [`fsm`]: states, events, the pure transition table and the engine
//! - [`app`]: ports, the application service and its shared handle
//! - [`events`]: single-consumer signal queue
//! - [`drivers`] / [`adapters`]: PWM backlight, software timer, logging

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod fsm;

pub use app::service::AppService;
pub use config::BacklightConfig;
pub use error::{Error, Result, TimerError};
pub use fsm::{Event, Fsm, State};
