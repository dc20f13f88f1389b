use std::sync::mpsc;
use std::time::Duration;

use alternate::alerts::RecordingAlerts;
use alternate::app::App;
use alternate::config::MemoryConfigStore;
use alternate::fsm::ControllerState;
use alternate::rounds::Player;
use alternate::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use alternate::session::SessionConfig;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn new_app(duration: u32, cycles: u32) -> App<MemoryConfigStore, RecordingAlerts> {
    App::new(
        MemoryConfigStore::with_config(SessionConfig::new(duration, cycles)),
        RecordingAlerts::new(),
    )
}

/// Same loop shape as the binary, bounded by `max_steps`
fn drive<E: alternate::runtime::EventSource>(
    app: &mut App<MemoryConfigStore, RecordingAlerts>,
    runner: &mut Runner<E, FixedTicker>,
    max_steps: u32,
    until: impl Fn(&App<MemoryConfigStore, RecordingAlerts>) -> bool,
) {
    for _ in 0..max_steps {
        let generation = app.timer_generation();
        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Key(k) => app.on_key(k),
            AppEvent::NotificationAction => app.on_notification_action(),
            AppEvent::Resize => {}
        }
        if app.should_quit || until(app) {
            break;
        }
        if app.timer_generation() != generation {
            runner.realign();
        }
    }
}

// Headless run of a full turn through Runner/TestEventSource, without a TTY.
#[test]
fn headless_turn_expires_and_hands_over() {
    let mut app = new_app(1, 0);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(1));
    let mut runner = Runner::new(es, ticker);

    tx.send(key(KeyCode::Char('s'))).unwrap();

    drive(&mut app, &mut runner, 500, |app| {
        app.state() == ControllerState::Waiting
    });

    assert_eq!(app.state(), ControllerState::Waiting);
    assert_eq!(app.display().status_text.as_deref(), Some("Switch!"));
    assert!(app.controller.alerts().alarm_playing);

    tx.send(key(KeyCode::Char('n'))).unwrap();
    drive(&mut app, &mut runner, 1, |_| true);

    assert_eq!(app.state(), ControllerState::Active);
    assert_eq!(app.controller.rounds().current_player(), Player::Two);
    assert!(!app.controller.alerts().alarm_playing);
}

#[test]
fn headless_quit_key_stops_loop() {
    let mut app = new_app(1, 0);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Char('s'))).unwrap();
    tx.send(key(KeyCode::Char('q'))).unwrap();

    drive(&mut app, &mut runner, 10, |_| false);

    assert!(app.should_quit);
    assert!(!app.controller.timer().is_scheduled());
}

#[test]
fn headless_paused_turn_ignores_ticks() {
    let mut app = new_app(1, 0);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    tx.send(key(KeyCode::Enter)).unwrap();
    tx.send(key(KeyCode::Char(' '))).unwrap();
    drive(&mut app, &mut runner, 2, |_| false);
    assert_eq!(app.state(), ControllerState::ActivePaused);
    let remaining = app.controller.remaining_seconds();

    // the sender is still alive, so these are all real ticks
    drive(&mut app, &mut runner, 100, |_| false);
    assert_eq!(app.controller.remaining_seconds(), remaining);
    drop(tx);
}

#[test]
fn headless_preferences_dialog_starts_session() {
    let store = MemoryConfigStore::with_config(SessionConfig::new(3, 0));
    let mut app = App::new(store.clone(), RecordingAlerts::new());

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_secs(60)),
    );

    for code in [
        KeyCode::Char('c'),
        KeyCode::Left,
        KeyCode::Tab,
        KeyCode::Right,
        KeyCode::Enter,
    ] {
        tx.send(key(code)).unwrap();
    }
    drive(&mut app, &mut runner, 5, |_| false);

    assert_eq!(app.state(), ControllerState::Active);
    assert_eq!(app.controller.remaining_seconds(), 120);
    assert_eq!(
        alternate::config::ConfigStore::load(&store),
        Some(SessionConfig::new(2, 1))
    );
}

#[test]
fn headless_notification_action_continues_then_finishes() {
    let mut app = new_app(1, 1);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    tx.send(key(KeyCode::Char('s'))).unwrap();
    drive(&mut app, &mut runner, 500, |app| {
        app.state() == ControllerState::Waiting
    });
    assert_eq!(app.state(), ControllerState::Waiting);

    tx.send(AppEvent::NotificationAction).unwrap();
    drive(&mut app, &mut runner, 1, |_| true);
    assert_eq!(app.state(), ControllerState::Active);
    assert_eq!(app.controller.rounds().current_player(), Player::Two);

    drive(&mut app, &mut runner, 500, |app| {
        app.state() == ControllerState::Finished
    });
    assert_eq!(app.state(), ControllerState::Finished);
    assert!(app.controller.alerts().alarm_playing);

    tx.send(AppEvent::NotificationAction).unwrap();
    drive(&mut app, &mut runner, 1, |_| true);
    assert_eq!(app.state(), ControllerState::Idle);
    assert!(!app.controller.alerts().alarm_playing);
}
