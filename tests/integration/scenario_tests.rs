//! End-to-end scenarios: events and timer expiries through the service
//! down to backlight calls.

use backlight::adapters::hardware::HardwareAdapter;
use backlight::app::events::AppEvent;
use backlight::app::service::AppService;
use backlight::config::BacklightConfig;
use backlight::drivers::backlight::{BacklightDriver, BacklightOutput};
use backlight::drivers::timer::OneShotTimer;
use backlight::fsm::effects::TimerKind;
use backlight::fsm::{Event, State};
use embassy_time::{Duration, Instant};

use super::mock_hw::{FakePin, FakePwm, HwCall, MockHardware, RecordingSink};

fn make_app() -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(BacklightConfig::default()).unwrap();
    let hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, hw, sink)
}

fn fire(app: &mut AppService, hw: &mut MockHardware, sink: &mut RecordingSink) -> bool {
    let token = hw.fire().expect("a timer should be armed");
    app.on_timer_expired(token, hw, sink).unwrap()
}

// ── Full lifecycle ────────────────────────────────────────────

#[test]
fn lifecycle_off_warmup_on_shutdown_off() {
    let (mut app, mut hw, mut sink) = make_app();
    assert_eq!(sink.events[0], AppEvent::Started(State::Off));

    app.handle_event(Event::SystemStart, &mut hw, &mut sink).unwrap();
    assert_eq!(app.state(), State::Warmup);
    assert_eq!(hw.brightness(), Some(10));
    assert!(!app.is_action_permitted());

    assert!(fire(&mut app, &mut hw, &mut sink));
    assert_eq!(app.state(), State::On);
    assert_eq!(hw.brightness(), Some(100));
    assert!(app.is_action_permitted());

    // Inactivity window elapses.
    assert!(fire(&mut app, &mut hw, &mut sink));
    assert_eq!(app.state(), State::Shutdown);
    assert_eq!(hw.brightness(), Some(30));

    assert!(fire(&mut app, &mut hw, &mut sink));
    assert_eq!(app.state(), State::Off);
    assert!(!hw.powered());
    assert!(hw.armed.is_empty());
    assert!(app.armed_timer().is_none());

    let transitions: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (State::Off, State::Warmup),
            (State::Warmup, State::On),
            (State::On, State::Shutdown),
            (State::Shutdown, State::Off),
        ]
    );
}

#[test]
fn user_returns_during_shutdown() {
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_event(Event::SystemStart, &mut hw, &mut sink).unwrap();
    fire(&mut app, &mut hw, &mut sink);

    app.handle_event(Event::UserInactive, &mut hw, &mut sink).unwrap();
    assert_eq!(app.state(), State::Shutdown);
    let shutdown = app.armed_timer().unwrap();
    assert_eq!(shutdown.kind, TimerKind::Shutdown);

    app.handle_event(Event::UserAction, &mut hw, &mut sink).unwrap();
    assert_eq!(app.state(), State::On);
    assert_eq!(hw.brightness(), Some(100));
    assert!(hw.calls.contains(&HwCall::Cancel(shutdown)));
    assert_eq!(hw.armed.len(), 1);
    assert_eq!(app.armed_timer().unwrap().kind, TimerKind::Inactivity);
}

#[test]
fn activity_keeps_the_backlight_on() {
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_event(Event::SystemStart, &mut hw, &mut sink).unwrap();
    fire(&mut app, &mut hw, &mut sink);

    for _ in 0..10 {
        app.handle_event(Event::UserAction, &mut hw, &mut sink).unwrap();
        assert_eq!(app.state(), State::On);
        assert_eq!(hw.armed.len(), 1);
    }
    assert!(sink.has(&AppEvent::Refreshed {
        state: State::On,
        event: Event::UserAction,
    }));
    assert_eq!(app.stats().applied, 12);
}

// ── Stale expiries ────────────────────────────────────────────

#[test]
fn late_shutdown_expiry_is_dropped() {
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_event(Event::SystemStart, &mut hw, &mut sink).unwrap();
    fire(&mut app, &mut hw, &mut sink);
    app.handle_event(Event::UserInactive, &mut hw, &mut sink).unwrap();
    let shutdown = app.armed_timer().unwrap();

    app.handle_event(Event::UserAction, &mut hw, &mut sink).unwrap();

    // The backend already queued the shutdown expiry before the cancel.
    let delivered = app.on_timer_expired(shutdown, &mut hw, &mut sink).unwrap();
    assert!(!delivered);
    assert_eq!(app.state(), State::On);
    assert!(hw.powered());
    assert_eq!(app.stats().stale_timeouts, 1);
    assert!(sink.has(&AppEvent::StaleTimeout(shutdown)));
}

// ── Ignored and invalid input ─────────────────────────────────

#[test]
fn input_before_start_is_ignored() {
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_event(Event::UserAction, &mut hw, &mut sink).unwrap();
    app.handle_event(Event::Timeout, &mut hw, &mut sink).unwrap();

    assert_eq!(app.state(), State::Off);
    assert!(hw.calls.is_empty());
    assert_eq!(app.stats().ignored, 2);
    assert!(sink.has(&AppEvent::EventIgnored {
        state: State::Off,
        event: Event::UserAction,
    }));
}

#[test]
fn unknown_code_is_rejected_without_side_effects() {
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_raw(0, &mut hw, &mut sink).unwrap();
    let calls = hw.calls.len();

    let err = app.handle_raw(9, &mut hw, &mut sink).unwrap_err();
    assert_eq!(err, backlight::Error::InvalidEvent(9));
    assert!(!err.is_fatal());
    assert_eq!(app.state(), State::Warmup);
    assert_eq!(hw.calls.len(), calls);
    assert!(sink.has(&AppEvent::EventRejected(9)));
    assert_eq!(app.stats().rejected, 1);
}

// ── Driver-level adapter ──────────────────────────────────────

#[test]
fn hardware_adapter_runs_the_full_cycle_on_a_software_timer() {
    let mut app = AppService::new(BacklightConfig::default()).unwrap();
    let mut hw = HardwareAdapter::new(
        BacklightDriver::new(FakePwm { duty: 0 }, FakePin { high: false }),
        OneShotTimer::new(),
    );
    let mut sink = RecordingSink::new();

    app.handle_event(Event::SystemStart, &mut hw, &mut sink).unwrap();
    assert_eq!(hw.output(), BacklightOutput::On { brightness: 10 });
    assert_eq!(hw.timer_remaining(), Some(Duration::from_millis(500)));

    assert!(hw.poll(Instant::from_millis(499)).is_none());
    let warmup = hw.poll(Instant::from_millis(500)).unwrap();
    assert!(app.on_timer_expired(warmup, &mut hw, &mut sink).unwrap());
    assert_eq!(app.state(), State::On);
    assert_eq!(hw.output(), BacklightOutput::On { brightness: 100 });

    assert!(hw.poll(Instant::from_millis(1_000)).is_none());
    app.handle_event(Event::UserInactive, &mut hw, &mut sink).unwrap();
    assert_eq!(hw.output(), BacklightOutput::On { brightness: 30 });

    assert!(hw.poll(Instant::from_millis(5_999)).is_none());
    let shutdown = hw.poll(Instant::from_millis(6_000)).unwrap();
    assert!(app.on_timer_expired(shutdown, &mut hw, &mut sink).unwrap());
    assert_eq!(app.state(), State::Off);
    assert_eq!(hw.output(), BacklightOutput::Off);
    assert!(hw.timer_remaining().is_none());
}

#[test]
fn hardware_adapter_cancel_prevents_expiry() {
    let mut app = AppService::new(BacklightConfig::default()).unwrap();
    let mut hw = HardwareAdapter::new(
        BacklightDriver::new(FakePwm { duty: 0 }, FakePin { high: false }),
        OneShotTimer::new(),
    );
    let mut sink = RecordingSink::new();

    app.handle_event(Event::SystemStart, &mut hw, &mut sink).unwrap();
    let warmup = hw.poll(Instant::from_millis(500)).unwrap();
    app.on_timer_expired(warmup, &mut hw, &mut sink).unwrap();
    app.handle_event(Event::UserInactive, &mut hw, &mut sink).unwrap();
    app.handle_event(Event::UserAction, &mut hw, &mut sink).unwrap();

    // Past the old shutdown deadline, short of the new inactivity one.
    assert!(hw.poll(Instant::from_millis(10_000)).is_none());
    assert_eq!(app.state(), State::On);
    assert_eq!(hw.output(), BacklightOutput::On { brightness: 100 });
}
