//! Single-consumer event queue.
//!
//! Signals are produced by:
//! - the input mapping layer (touch / button drivers, system lifecycle)
//! - timer callbacks (expiry tokens)
//!
//! and consumed by the main loop, which hands them one at a time to
//! [`AppService::dispatch`](crate::app::service::AppService::dispatch).
//! Funnelling every producer through this queue is what serialises event
//! delivery and timer expiry on hosts where they run in different
//! contexts.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Input ISR   │────▶│              │     │              │
//! │ Timer ISR   │────▶│  EventQueue  │────▶│  Main Loop   │
//! │ Lifecycle   │────▶│  (SPSC)      │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use heapless::spsc::{Consumer, Producer, Queue};

use crate::fsm::Event;
use crate::fsm::effects::TimerToken;

/// Default queue depth.  One slot is reserved by the ring buffer, so the
/// usable capacity is `EVENT_QUEUE_CAP - 1`.
pub const EVENT_QUEUE_CAP: usize = 16;

/// One unit of work for the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Undecoded event code straight from an input driver.
    Raw(u8),
    /// Already-validated event.
    Event(Event),
    /// A timer backend reports that `token` elapsed.
    TimerExpired(TimerToken),
}

/// Fixed-capacity FIFO of [`Signal`]s.
pub struct EventQueue<const N: usize = EVENT_QUEUE_CAP> {
    queue: Queue<Signal, N>,
    /// Shared with the split producer, which may run in an ISR.
    dropped: AtomicU32,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a signal.  Returns `false` if the queue is full (signal dropped).
    pub fn push(&mut self, signal: Signal) -> bool {
        if self.queue.enqueue(signal).is_ok() {
            true
        } else {
            record_drop(&self.dropped, signal);
            false
        }
    }

    /// Pop the oldest signal.
    pub fn pop(&mut self) -> Option<Signal> {
        self.queue.dequeue()
    }

    /// Drain all pending signals into a callback, in FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(Signal)) {
        while let Some(signal) = self.pop() {
            handler(signal);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Signals lost to a full queue since construction.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Split into an ISR-side producer and a main-loop consumer.  Drops on
    /// the producer side are counted in [`dropped`](Self::dropped).
    pub fn split(&mut self) -> (SignalProducer<'_, N>, Consumer<'_, Signal, N>) {
        let (producer, consumer) = self.queue.split();
        (
            SignalProducer {
                producer,
                dropped: &self.dropped,
            },
            consumer,
        )
    }
}

/// Producer half of a split [`EventQueue`].
pub struct SignalProducer<'a, const N: usize> {
    producer: Producer<'a, Signal, N>,
    dropped: &'a AtomicU32,
}

impl<const N: usize> SignalProducer<'_, N> {
    /// Push a signal.  Returns `false` if the queue is full (signal dropped).
    pub fn push(&mut self, signal: Signal) -> bool {
        if self.producer.enqueue(signal).is_ok() {
            true
        } else {
            record_drop(self.dropped, signal);
            false
        }
    }

    pub fn ready(&self) -> bool {
        self.producer.ready()
    }
}

fn record_drop(dropped: &AtomicU32, signal: Signal) {
    // Saturate instead of wrapping.
    let _ = dropped.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1));
    log::warn!("EventQueue: full, dropped {:?}", signal);
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
