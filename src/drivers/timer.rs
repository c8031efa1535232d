//! Single-slot one-shot software timer.
//!
//! Poll-driven: the main loop calls [`OneShotTimer::poll`] with the
//! current monotonic time and receives the token of a timer that elapsed.
//! Arming uses the time of the most recent poll, so deadlines lag by at
//! most one poll period.
//!
//! One slot is enough because the state machine never layers timers; a
//! second arming without a cancel is reported as resource exhaustion.

use embassy_time::{Duration, Instant};
use log::debug;

use crate::error::TimerError;
use crate::fsm::effects::TimerToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    token: TimerToken,
    deadline: Instant,
}

#[derive(Debug)]
pub struct OneShotTimer {
    slot: Option<Pending>,
    /// Time observed by the latest poll.
    now: Instant,
}

impl Default for OneShotTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self {
            slot: None,
            now: Instant::from_ticks(0),
        }
    }

    pub fn arm(&mut self, token: TimerToken, duration: Duration) -> Result<(), TimerError> {
        if let Some(pending) = self.slot {
            debug!("timer: {} still armed, refusing {}", pending.token, token);
            return Err(TimerError::NoFreeSlot);
        }
        let deadline = self
            .now
            .checked_add(duration)
            .ok_or(TimerError::DeadlineOverflow)?;
        self.slot = Some(Pending { token, deadline });
        debug!("timer: armed {} for {} ms", token, duration.as_millis());
        Ok(())
    }

    /// Cancel `token` if it is the armed one.  Unknown tokens are ignored:
    /// the timer may already have fired.
    pub fn cancel(&mut self, token: TimerToken) {
        if self.slot.is_some_and(|p| p.token == token) {
            self.slot = None;
            debug!("timer: cancelled {}", token);
        }
    }

    /// Advance to `now` and return the token of an elapsed timer.  Each
    /// arming is reported at most once.
    pub fn poll(&mut self, now: Instant) -> Option<TimerToken> {
        if now > self.now {
            self.now = now;
        }
        match self.slot {
            Some(pending) if pending.deadline <= self.now => {
                self.slot = None;
                Some(pending.token)
            }
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    /// Time left before the armed timer fires, as of the latest poll.
    pub fn remaining(&self) -> Option<Duration> {
        self.slot
            .map(|p| p.deadline.saturating_duration_since(self.now))
    }
}
