use crate::rounds::Player;
use crate::runtime::AppEvent;
use itertools::Itertools;
use notify_rust::{Notification, Timeout};
#[cfg(all(unix, not(target_os = "macos")))]
use notify_rust::Urgency;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    SwitchTurn,
    Finished,
}

/// What to tell the pair when a turn or the session ends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub next_player: Option<Player>,
}

impl Notice {
    pub fn switch_turn(next_player: Player) -> Self {
        Self {
            kind: NoticeKind::SwitchTurn,
            next_player: Some(next_player),
        }
    }

    pub fn finished() -> Self {
        Self {
            kind: NoticeKind::Finished,
            next_player: None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::SwitchTurn => "Switch!",
            NoticeKind::Finished => "Session finished",
        }
    }

    pub fn body(&self) -> String {
        match (self.kind, self.next_player) {
            (NoticeKind::SwitchTurn, Some(p)) => format!("Player {}, your turn", p.number()),
            (NoticeKind::SwitchTurn, None) => "Time to switch".to_string(),
            (NoticeKind::Finished, _) => "All rounds are done".to_string(),
        }
    }

    /// Label of the single action button
    pub fn action_label(&self) -> String {
        match (self.kind, self.next_player) {
            (NoticeKind::SwitchTurn, Some(p)) => format!("Continue (Player {})", p.number()),
            (NoticeKind::SwitchTurn, None) => "Continue".to_string(),
            (NoticeKind::Finished, _) => "Finish".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("no sound player found (tried {0})")]
    NoPlayer(String),
    #[error("failed to start alarm sound: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("failed to show notification: {0}")]
    Notification(#[from] notify_rust::error::Error),
}

/// Audio and desktop notification side of an alert
pub trait AlertSink {
    /// Start the alarm; it keeps looping until [`stop_alarm`](Self::stop_alarm)
    fn play_alarm(&mut self) -> Result<(), AlertError>;
    fn stop_alarm(&mut self);
    fn show_notification(&mut self, notice: Notice) -> Result<(), AlertError>;
    fn hide_notification(&mut self);
}

const SOUND_CANDIDATES: &[(&str, &str)] = &[
    ("paplay", "/usr/share/sounds/freedesktop/stereo/alarm-clock-elapsed.oga"),
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
    ("aplay", "/usr/share/sounds/generic.wav"),
    ("afplay", "/System/Library/Sounds/Glass.aiff"),
];

const POLL_INTERVAL: Duration = Duration::from_millis(150);

/// Key of the single notification action; most servers also invoke it when
/// the notification body is clicked
pub const ACTION_KEY: &str = "default";

fn play_once(player: &str, file: &str) -> std::io::Result<Child> {
    Command::new(player)
        .arg(file)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

/// Replays a sound file until stopped
struct AlarmLoop {
    stop: Arc<AtomicBool>,
    child: Arc<Mutex<Option<Child>>>,
    _worker: JoinHandle<()>,
}

impl AlarmLoop {
    fn spawn(player: &'static str, file: &'static str) -> Result<Self, AlertError> {
        let stop = Arc::new(AtomicBool::new(false));
        let child = Arc::new(Mutex::new(Some(play_once(player, file)?)));

        let worker = {
            let stop = Arc::clone(&stop);
            let child = Arc::clone(&child);
            thread::spawn(move || loop {
                thread::sleep(POLL_INTERVAL);
                let Ok(mut slot) = child.lock() else { break };
                if stop.load(Ordering::SeqCst) {
                    break;
                }
                let finished = match slot.as_mut() {
                    Some(c) => !matches!(c.try_wait(), Ok(None)),
                    None => true,
                };
                if finished {
                    match play_once(player, file) {
                        Ok(next) => *slot = Some(next),
                        Err(_) => break,
                    }
                }
            })
        };

        Ok(Self {
            stop,
            child,
            _worker: worker,
        })
    }

    fn stop(self) {
        let slot = self.child.lock();
        self.stop.store(true, Ordering::SeqCst);
        if let Ok(mut slot) = slot {
            if let Some(mut c) = slot.take() {
                let _ = c.kill();
                let _ = c.wait();
            }
        }
    }
}

/// Forward a click on notification `id` into the event loop. The listener
/// ends when the notification is clicked or closed.
#[cfg(all(unix, not(target_os = "macos")))]
fn listen_for_action(id: u32, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        notify_rust::handle_action(id, move |response: &notify_rust::ActionResponse<'_>| {
            if matches!(response, notify_rust::ActionResponse::Custom(action) if *action == ACTION_KEY) {
                debug!(id, "notification action invoked");
                let _ = tx.send(AppEvent::NotificationAction);
            }
        });
    });
}

/// Alerts through the desktop: a looped system sound and a notification
pub struct DesktopAlerts {
    sound: bool,
    notify: bool,
    alarm: Option<AlarmLoop>,
    #[cfg(all(unix, not(target_os = "macos")))]
    shown: Option<notify_rust::NotificationHandle>,
    #[cfg(all(unix, not(target_os = "macos")))]
    actions: Option<Sender<AppEvent>>,
}

impl DesktopAlerts {
    pub fn new(sound: bool, notify: bool) -> Self {
        Self {
            sound,
            notify,
            alarm: None,
            #[cfg(all(unix, not(target_os = "macos")))]
            shown: None,
            #[cfg(all(unix, not(target_os = "macos")))]
            actions: None,
        }
    }

    /// Report action button clicks as [`AppEvent::NotificationAction`].
    /// Only xdg notification servers support actions.
    #[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(unused_mut))]
    pub fn with_actions(mut self, tx: Sender<AppEvent>) -> Self {
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            self.actions = Some(tx);
        }
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        drop(tx);
        self
    }

    fn find_sound() -> Option<(&'static str, &'static str)> {
        SOUND_CANDIDATES
            .iter()
            .copied()
            .find(|(_, file)| Path::new(file).exists())
    }
}

impl AlertSink for DesktopAlerts {
    fn play_alarm(&mut self) -> Result<(), AlertError> {
        if !self.sound {
            return Ok(());
        }
        self.stop_alarm();

        let (player, file) = Self::find_sound().ok_or_else(|| {
            AlertError::NoPlayer(SOUND_CANDIDATES.iter().map(|(p, _)| *p).unique().join(", "))
        })?;
        debug!(player, file, "starting alarm loop");
        self.alarm = Some(AlarmLoop::spawn(player, file)?);
        Ok(())
    }

    fn stop_alarm(&mut self) {
        if let Some(alarm) = self.alarm.take() {
            alarm.stop();
        }
    }

    fn show_notification(&mut self, notice: Notice) -> Result<(), AlertError> {
        if !self.notify {
            return Ok(());
        }
        self.hide_notification();

        let mut notification = Notification::new();
        notification
            .summary(notice.title())
            .body(&notice.body())
            .appname("alternate")
            .icon("alarm-clock")
            .timeout(Timeout::Never);

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            notification.urgency(Urgency::Critical);
            notification.action(ACTION_KEY, &notice.action_label());
            let handle = notification.show()?;
            if let Some(tx) = &self.actions {
                listen_for_action(handle.id(), tx.clone());
            }
            self.shown = Some(handle);
        }
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            notification.show()?;
        }
        Ok(())
    }

    fn hide_notification(&mut self) {
        #[cfg(all(unix, not(target_os = "macos")))]
        if let Some(handle) = self.shown.take() {
            handle.close();
        }
    }
}

impl Drop for DesktopAlerts {
    fn drop(&mut self) {
        self.stop_alarm();
        self.hide_notification();
    }
}

/// One call made against a [`RecordingAlerts`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertCall {
    PlayAlarm,
    StopAlarm,
    ShowNotification(Notice),
    HideNotification,
}

/// In-memory sink that remembers every call
#[derive(Debug, Default)]
pub struct RecordingAlerts {
    pub calls: Vec<AlertCall>,
    pub alarm_playing: bool,
    pub notice: Option<Notice>,
    /// make `play_alarm` fail like a missing sound asset would
    pub fail_audio: bool,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_audio() -> Self {
        Self {
            fail_audio: true,
            ..Self::default()
        }
    }

    pub fn count(&self, call: AlertCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl AlertSink for RecordingAlerts {
    fn play_alarm(&mut self) -> Result<(), AlertError> {
        self.calls.push(AlertCall::PlayAlarm);
        if self.fail_audio {
            return Err(AlertError::NoPlayer("test".to_string()));
        }
        self.alarm_playing = true;
        Ok(())
    }

    fn stop_alarm(&mut self) {
        self.calls.push(AlertCall::StopAlarm);
        self.alarm_playing = false;
    }

    fn show_notification(&mut self, notice: Notice) -> Result<(), AlertError> {
        self.calls.push(AlertCall::ShowNotification(notice));
        self.notice = Some(notice);
        Ok(())
    }

    fn hide_notification(&mut self) {
        self.calls.push(AlertCall::HideNotification);
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_notice_text() {
        let notice = Notice::switch_turn(Player::Two);
        assert_eq!(notice.title(), "Switch!");
        assert_eq!(notice.body(), "Player 2, your turn");
        assert_eq!(notice.action_label(), "Continue (Player 2)");
    }

    #[test]
    fn test_finished_notice_text() {
        let notice = Notice::finished();
        assert_eq!(notice.next_player, None);
        assert_eq!(notice.action_label(), "Finish");
    }

    #[test]
    fn test_disabled_desktop_alerts_are_noops() {
        let mut alerts = DesktopAlerts::new(false, false);
        assert!(alerts.play_alarm().is_ok());
        assert!(alerts.show_notification(Notice::finished()).is_ok());
        alerts.stop_alarm();
        alerts.hide_notification();
    }

    #[test]
    fn test_recording_alerts_track_state() {
        let mut alerts = RecordingAlerts::new();
        alerts.play_alarm().unwrap();
        alerts.show_notification(Notice::finished()).unwrap();
        assert!(alerts.alarm_playing);
        alerts.stop_alarm();
        alerts.hide_notification();
        assert!(!alerts.alarm_playing);
        assert_eq!(alerts.notice, None);
        assert_eq!(alerts.count(AlertCall::PlayAlarm), 1);
    }

    #[test]
    fn test_failing_audio_reports_error() {
        let mut alerts = RecordingAlerts::failing_audio();
        assert!(matches!(alerts.play_alarm(), Err(AlertError::NoPlayer(_))));
        assert!(!alerts.alarm_playing);
    }
}
