//! Shared service handle for hosts with concurrent event sources.
//!
//! When input handling and timer callbacks run in different contexts
//! (threads, interrupt priorities), every call into the state machine must
//! pass one mutual-exclusion point.  [`SharedService`] is that point: each
//! delivery and each query runs inside a critical section, so no observer
//! ever sees a state without its matching timer status.
//!
//! Hosts that already funnel everything through one loop can use
//! [`AppService`] directly.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::config::BacklightConfig;
use crate::error::Result;
use crate::fsm::effects::TimerToken;
use crate::fsm::{Event, State};

use super::ports::{BacklightPort, EventSink, TimerPort};
use super::service::AppService;

/// [`AppService`] behind a critical-section mutex.  Place it in a `static`
/// or an `Arc` and call it from any context.
pub struct SharedService {
    inner: Mutex<CriticalSectionRawMutex, RefCell<AppService>>,
}

impl SharedService {
    pub fn new(service: AppService) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(service)),
        }
    }

    pub fn handle_event<H>(&self, event: Event, hw: &mut H, sink: &mut impl EventSink) -> Result<()>
    where
        H: TimerPort + BacklightPort,
    {
        self.inner
            .lock(|service| service.borrow_mut().handle_event(event, hw, sink))
    }

    pub fn handle_raw<H>(&self, code: u8, hw: &mut H, sink: &mut impl EventSink) -> Result<()>
    where
        H: TimerPort + BacklightPort,
    {
        self.inner
            .lock(|service| service.borrow_mut().handle_raw(code, hw, sink))
    }

    pub fn on_timer_expired<H>(
        &self,
        token: TimerToken,
        hw: &mut H,
        sink: &mut impl EventSink,
    ) -> Result<bool>
    where
        H: TimerPort + BacklightPort,
    {
        self.inner
            .lock(|service| service.borrow_mut().on_timer_expired(token, hw, sink))
    }

    pub fn update_config(&self, config: BacklightConfig) -> Result<()> {
        self.inner
            .lock(|service| service.borrow_mut().update_config(config))
    }

    /// Consistent `(state, armed timer)` pair.
    pub fn snapshot(&self) -> (State, Option<TimerToken>) {
        self.inner.lock(|service| {
            let service = service.borrow();
            (service.state(), service.armed_timer())
        })
    }

    pub fn state(&self) -> State {
        self.inner.lock(|service| service.borrow().state())
    }

    pub fn is_action_permitted(&self) -> bool {
        self.inner
            .lock(|service| service.borrow().is_action_permitted())
    }

    pub fn into_inner(self) -> AppService {
        self.inner.into_inner().into_inner()
    }
}
