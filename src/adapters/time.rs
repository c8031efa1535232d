//! Host monotonic clock.
//!
//! Converts `std::time::Instant` into the `embassy_time::Instant` time
//! base the timer driver works in, so host builds need no embassy time
//! driver.

use embassy_time::Instant;

/// Monotonic clock starting at zero when constructed.
pub struct HostClock {
    start: std::time::Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Time since construction.
    pub fn now(&self) -> Instant {
        Instant::from_micros(self.start.elapsed().as_micros() as u64)
    }
}
