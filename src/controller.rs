use crate::alerts::{AlertSink, Notice};
use crate::config::ConfigStore;
use crate::countdown::{CountdownTimer, TimerEvent};
use crate::display::{Controls, DisplaySink, IndicatorGlyph};
use crate::fsm::{self, ControllerState, Event, Hotkey, Transition, TransitionError};
use crate::rounds::RoundCounter;
use crate::session::SessionConfig;
use crate::util::to_minutes;
use tracing::{debug, error, info, warn};

pub const NOT_RUNNING: &str = "Not Running";
pub const SWITCH_TEXT: &str = "Switch!";
pub const FINISHED_TEXT: &str = "Finished!";

/// Whether the host loop should keep going after an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The session controller.
///
/// Owns the countdown and the round counter outright; collaborators only
/// receive what the controller pushes to them.
pub struct Controller<C: ConfigStore, D: DisplaySink, A: AlertSink> {
    state: ControllerState,
    config: SessionConfig,
    timer: CountdownTimer,
    rounds: RoundCounter,
    store: C,
    display: D,
    alerts: A,
}

impl<C: ConfigStore, D: DisplaySink, A: AlertSink> Controller<C, D, A> {
    pub fn new(store: C, mut display: D, alerts: A) -> Self {
        let config = match store.load() {
            Some(cfg) => cfg.sanitized(),
            None => {
                let cfg = SessionConfig::default();
                if let Err(e) = store.save(&cfg) {
                    warn!(error = %e, "could not persist default settings");
                }
                cfg
            }
        };

        display.set_status_text(None);
        display.set_indicator(IndicatorGlyph::Neutral);
        display.set_controls(Controls::for_state(ControllerState::Idle));
        display.set_preferences_visible(false);

        Self {
            state: ControllerState::Idle,
            config,
            timer: CountdownTimer::new(),
            rounds: RoundCounter::new(config.total_cycles),
            store,
            display,
            alerts,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn rounds(&self) -> &RoundCounter {
        &self.rounds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.timer.remaining_seconds()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn alerts(&self) -> &A {
        &self.alerts
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    pub fn has_more_rounds(&self) -> bool {
        self.rounds.has_more_rounds()
    }

    pub fn legal_events(&self) -> Vec<Event> {
        fsm::legal_events(self.state, self.has_more_rounds())
    }

    /// Apply `event` if the current state accepts it
    pub fn try_apply(&mut self, event: Event) -> Result<Transition, TransitionError> {
        let transition = fsm::transition(self.state, event, self.has_more_rounds()).ok_or(
            TransitionError::Rejected {
                event,
                state: self.state,
            },
        )?;
        self.run(transition)?;
        Ok(transition)
    }

    /// Production entry point: illegal events are logged and dropped
    pub fn dispatch(&mut self, event: Event) -> Flow {
        match self.try_apply(event) {
            Ok(Transition::Quit) => Flow::Quit,
            Ok(transition) => {
                info!(%event, %transition, state = %self.state, "transition");
                Flow::Continue
            }
            Err(e @ TransitionError::Rejected { .. }) => {
                debug!(error = %e, "ignoring event");
                Flow::Continue
            }
            Err(TransitionError::UnexpectedState { expected, actual }) => {
                error!(%event, %expected, %actual, "event routed to the wrong state");
                Flow::Continue
            }
        }
    }

    pub fn hotkey(&mut self, hotkey: Hotkey) -> Flow {
        match fsm::hotkey_event(self.state, hotkey) {
            Some(event) => self.dispatch(event),
            None => {
                debug!(%hotkey, state = %self.state, "hotkey has no meaning here");
                Flow::Continue
            }
        }
    }

    /// The continue control and the notification action both land here
    pub fn continue_or_acknowledge(&mut self) -> Flow {
        match fsm::continue_event(self.state) {
            Some(event) => self.dispatch(event),
            None => Flow::Continue,
        }
    }

    /// Called once per second by the host scheduler
    pub fn tick(&mut self) -> Flow {
        match self.timer.tick() {
            Some(TimerEvent::Tick(remaining)) => {
                self.display.set_status_text(Some(&to_minutes(remaining)));
                Flow::Continue
            }
            Some(TimerEvent::Expired) => self.dispatch(Event::TimerExpired),
            None => Flow::Continue,
        }
    }

    fn run(&mut self, transition: Transition) -> Result<(), TransitionError> {
        match transition {
            Transition::StartSession => self.start_session(),
            Transition::OpenPreferences => self.open_preferences(),
            Transition::CancelPreferences => self.cancel_preferences(),
            Transition::ConfirmPreferences => self.confirm_preferences(),
            Transition::SwitchTurn => self.switch_turn(),
            Transition::FinishSession => self.finish_session(),
            Transition::PauseTurn => self.pause_turn(),
            Transition::EndTurn => self.end_turn(),
            Transition::ResumeTurn => self.resume_turn(),
            Transition::EndPausedTurn => self.end_paused_turn(),
            Transition::ContinueTurn => self.continue_turn(),
            Transition::PauseSwitch => self.pause_switch(),
            Transition::EndSwitch => self.end_switch(),
            Transition::ResumeSwitch => self.resume_switch(),
            Transition::EndPausedSwitch => self.end_paused_switch(),
            Transition::Acknowledge => self.acknowledge(),
            Transition::Quit => {
                self.quit();
                Ok(())
            }
        }
    }

    // Transitions. Each asserts its source state so a direct call from the
    // wrong state fails instead of coercing the controller.

    pub fn start_session(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::Idle)?;
        self.begin_countdown();
        self.enter(ControllerState::Active);
        Ok(())
    }

    pub fn open_preferences(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::Idle)?;
        self.display.set_preferences_visible(true);
        self.enter(ControllerState::ConfiguringPreferences);
        Ok(())
    }

    pub fn cancel_preferences(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::ConfiguringPreferences)?;
        self.display.set_preferences_visible(false);
        self.enter(ControllerState::Idle);
        Ok(())
    }

    pub fn confirm_preferences(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::ConfiguringPreferences)?;
        self.config = self.store.load().map_or(self.config, SessionConfig::sanitized);
        self.rounds.set_total_cycles(self.config.total_cycles);
        info!(
            duration = self.config.duration_minutes,
            cycles = self.config.total_cycles,
            "settings updated"
        );
        self.display.set_preferences_visible(false);
        self.begin_countdown();
        self.enter(ControllerState::Active);
        Ok(())
    }

    pub fn switch_turn(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::Active)?;
        self.timer.cancel();
        self.raise_alert(Notice::switch_turn(self.rounds.next_player()));
        self.display.set_status_text(Some(SWITCH_TEXT));
        self.enter(ControllerState::Waiting);
        Ok(())
    }

    pub fn finish_session(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::Active)?;
        self.timer.cancel();
        self.raise_alert(Notice::finished());
        self.rounds.reset();
        self.display.set_status_text(Some(FINISHED_TEXT));
        self.enter(ControllerState::Finished);
        Ok(())
    }

    pub fn pause_turn(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::Active)?;
        self.timer.pause();
        self.enter(ControllerState::ActivePaused);
        Ok(())
    }

    pub fn resume_turn(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::ActivePaused)?;
        self.timer.resume();
        self.enter(ControllerState::Active);
        Ok(())
    }

    pub fn end_turn(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::Active)?;
        self.timer.cancel();
        self.return_to_idle();
        Ok(())
    }

    pub fn end_paused_turn(&mut self) -> Result<(), TransitionError> {
        self.resume_turn()?;
        self.end_turn()
    }

    pub fn continue_turn(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::Waiting)?;
        self.silence();
        self.rounds.advance();
        self.begin_countdown();
        self.enter(ControllerState::Active);
        Ok(())
    }

    pub fn pause_switch(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::Waiting)?;
        self.silence();
        self.enter(ControllerState::WaitingPaused);
        Ok(())
    }

    pub fn end_switch(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::Waiting)?;
        self.silence();
        self.timer.cancel();
        self.return_to_idle();
        Ok(())
    }

    /// Resuming a paused switch is a deferred continue
    pub fn resume_switch(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::WaitingPaused)?;
        self.state = ControllerState::Waiting;
        self.continue_turn()
    }

    /// Drains through `Waiting` without starting the next turn
    pub fn end_paused_switch(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::WaitingPaused)?;
        self.state = ControllerState::Waiting;
        self.end_switch()
    }

    pub fn acknowledge(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ControllerState::Finished)?;
        self.silence();
        self.return_to_idle();
        Ok(())
    }

    pub fn quit(&mut self) {
        info!(state = %self.state, "quitting");
        self.timer.cancel();
        self.silence();
    }

    /// Indicator menu status line
    pub fn status_line(&self) -> String {
        if self.state == ControllerState::Idle {
            return NOT_RUNNING.to_string();
        }

        let cycle = if self.rounds.is_unlimited() {
            format!("Round {}", self.rounds.current_cycle())
        } else {
            format!(
                "Round {}/{}",
                self.rounds.current_cycle(),
                self.rounds.total_cycles()
            )
        };
        format!("{}, {}", cycle, self.rounds.current_player())
    }

    pub fn start_label(&self) -> String {
        let rounds = if self.config.is_unlimited() {
            String::new()
        } else {
            format!("{} ", self.config.total_cycles)
        };
        format!(
            "Start {}rounds of {} minutes",
            rounds, self.config.duration_minutes
        )
    }

    pub fn continue_label(&self) -> Option<String> {
        match self.state {
            ControllerState::Waiting => Some(format!(
                "Continue (Player {})",
                self.rounds.next_player().number()
            )),
            ControllerState::Finished => Some("Finish".to_string()),
            _ => None,
        }
    }

    fn expect_state(&self, expected: ControllerState) -> Result<(), TransitionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(TransitionError::UnexpectedState {
                expected,
                actual: self.state,
            })
        }
    }

    fn enter(&mut self, state: ControllerState) {
        self.state = state;
        self.display.set_controls(Controls::for_state(state));
    }

    fn begin_countdown(&mut self) {
        self.timer.start(self.config.duration_minutes);
        self.display
            .set_status_text(Some(&to_minutes(self.timer.remaining_seconds())));
        self.display
            .set_indicator(IndicatorGlyph::for_player(self.rounds.current_player()));
    }

    fn return_to_idle(&mut self) {
        self.rounds.reset();
        self.display.set_status_text(None);
        self.display.set_indicator(IndicatorGlyph::Neutral);
        self.enter(ControllerState::Idle);
    }

    fn raise_alert(&mut self, notice: Notice) {
        if let Err(e) = self.alerts.play_alarm() {
            warn!(error = %e, "alarm could not be played");
        }
        if let Err(e) = self.alerts.show_notification(notice) {
            warn!(error = %e, "notification could not be shown");
        }
    }

    fn silence(&mut self) {
        self.alerts.stop_alarm();
        self.alerts.hide_notification();
    }
}
