//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to                        |
//! |-------------|----------------|------------------------------------|
//! | `hardware`  | BacklightPort  | PWM channel + enable pin           |
//! |             | TimerPort      | poll-driven one-shot timer         |
//! | `log_sink`  | EventSink      | `log` output                       |
//! | `time`      | (none)         | host monotonic clock               |

pub mod hardware;
pub mod log_sink;
pub mod time;
