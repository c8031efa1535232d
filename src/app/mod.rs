//! Application core: orchestration around the state machine, zero I/O.
//!
//! All interaction with hardware and timers happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod shared;
