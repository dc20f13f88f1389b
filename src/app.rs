use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::alerts::AlertSink;
use crate::config::ConfigStore;
use crate::controller::{Controller, Flow};
use crate::display::DisplayModel;
use crate::fsm::{ControllerState, Event};
use crate::keymap::{command_for_key, Command};
use crate::preferences::{Outcome, PreferencesDialog};

/// Terminal front end: routes input into the controller and keeps the
/// dialog state the renderer needs.
pub struct App<C: ConfigStore + Clone, A: AlertSink> {
    pub controller: Controller<C, DisplayModel, A>,
    pub preferences: Option<PreferencesDialog>,
    pub session_started: Option<DateTime<Local>>,
    pub should_quit: bool,
    store: C,
}

impl<C: ConfigStore + Clone, A: AlertSink> App<C, A> {
    pub fn new(store: C, alerts: A) -> Self {
        let controller = Controller::new(store.clone(), DisplayModel::new(), alerts);
        Self {
            controller,
            preferences: None,
            session_started: None,
            should_quit: false,
            store,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn display(&self) -> &DisplayModel {
        self.controller.display()
    }

    /// Changes whenever a countdown is (re)started
    pub fn timer_generation(&self) -> u64 {
        self.controller.timer().generation()
    }

    pub fn on_tick(&mut self) {
        let flow = self.controller.tick();
        self.settle(flow);
    }

    /// The notification button stands for the continue control
    pub fn on_notification_action(&mut self) {
        let flow = self.controller.continue_or_acknowledge();
        self.settle(flow);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            let flow = self.controller.dispatch(Event::Quit);
            self.settle(flow);
            return;
        }

        if let Some(dialog) = self.preferences.as_mut() {
            let flow = match dialog.handle_key(key.code) {
                Some(Outcome::Confirmed) => {
                    dialog.apply(&self.store);
                    self.controller.dispatch(Event::ConfirmPreferences)
                }
                Some(Outcome::Cancelled) => self.controller.dispatch(Event::CancelPreferences),
                None => Flow::Continue,
            };
            self.settle(flow);
            return;
        }

        let Some(command) = command_for_key(key) else {
            debug!(?key, "unmapped key");
            return;
        };
        let flow = match command {
            Command::QuickStart => self.controller.dispatch(Event::Start),
            Command::CustomStart => self.controller.dispatch(Event::OpenPreferences),
            Command::Continue => self.controller.continue_or_acknowledge(),
            Command::Pause => self.controller.dispatch(Event::Pause),
            Command::Resume => self.controller.dispatch(Event::Resume),
            Command::End => self.controller.dispatch(Event::End),
            Command::Quit => self.controller.dispatch(Event::Quit),
            Command::Hotkey(hotkey) => self.controller.hotkey(hotkey),
        };
        self.settle(flow);
    }

    /// Bring the front-end state in line with what the controller pushed
    fn settle(&mut self, flow: Flow) {
        if flow == Flow::Quit {
            self.should_quit = true;
        }

        let visible = self.display().preferences_visible;
        match (visible, self.preferences.is_some()) {
            (true, false) => {
                let current = self.store.load().unwrap_or(self.controller.config());
                self.preferences = Some(PreferencesDialog::new(current));
            }
            (false, true) => self.preferences = None,
            _ => {}
        }

        match self.state() {
            ControllerState::Idle | ControllerState::ConfiguringPreferences => {
                self.session_started = None
            }
            _ if self.session_started.is_none() => self.session_started = Some(Local::now()),
            _ => {}
        }
    }
}
