//! The transition table of the session controller.
//!
//! Every (state, event) pair resolves to either a named [`Transition`] or
//! `None`. The controller only ever executes what this table returns, so an
//! event that arrives in the wrong state is dropped before it can touch the
//! timer or the round counter.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum ControllerState {
    Idle,
    ConfiguringPreferences,
    Active,
    Waiting,
    ActivePaused,
    WaitingPaused,
    Finished,
}

impl ControllerState {
    pub const ALL: [ControllerState; 7] = [
        ControllerState::Idle,
        ControllerState::ConfiguringPreferences,
        ControllerState::Active,
        ControllerState::Waiting,
        ControllerState::ActivePaused,
        ControllerState::WaitingPaused,
        ControllerState::Finished,
    ];

    pub fn is_paused(self) -> bool {
        matches!(
            self,
            ControllerState::ActivePaused | ControllerState::WaitingPaused
        )
    }
}

/// Inbound events, whatever surface they came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Event {
    Start,
    OpenPreferences,
    CancelPreferences,
    ConfirmPreferences,
    TimerExpired,
    Pause,
    Resume,
    End,
    Continue,
    Acknowledge,
    Quit,
}

impl Event {
    pub const ALL: [Event; 11] = [
        Event::Start,
        Event::OpenPreferences,
        Event::CancelPreferences,
        Event::ConfirmPreferences,
        Event::TimerExpired,
        Event::Pause,
        Event::Resume,
        Event::End,
        Event::Continue,
        Event::Acknowledge,
        Event::Quit,
    ];
}

/// Abstract global hotkey signals
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Hotkey {
    Go,
    PauseToggle,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Transition {
    StartSession,
    OpenPreferences,
    CancelPreferences,
    ConfirmPreferences,
    SwitchTurn,
    FinishSession,
    PauseTurn,
    EndTurn,
    ResumeTurn,
    EndPausedTurn,
    ContinueTurn,
    PauseSwitch,
    EndSwitch,
    ResumeSwitch,
    EndPausedSwitch,
    Acknowledge,
    Quit,
}

impl Transition {
    /// State the transition asserts before running
    pub fn from_state(self) -> Option<ControllerState> {
        use ControllerState::*;

        match self {
            Transition::StartSession | Transition::OpenPreferences => Some(Idle),
            Transition::CancelPreferences | Transition::ConfirmPreferences => {
                Some(ConfiguringPreferences)
            }
            Transition::SwitchTurn
            | Transition::FinishSession
            | Transition::PauseTurn
            | Transition::EndTurn => Some(Active),
            Transition::ResumeTurn | Transition::EndPausedTurn => Some(ActivePaused),
            Transition::ContinueTurn | Transition::PauseSwitch | Transition::EndSwitch => {
                Some(Waiting)
            }
            Transition::ResumeSwitch | Transition::EndPausedSwitch => Some(WaitingPaused),
            Transition::Acknowledge => Some(Finished),
            Transition::Quit => None,
        }
    }

    /// State the controller is in once the transition completes
    pub fn to_state(self) -> Option<ControllerState> {
        use ControllerState::*;

        match self {
            Transition::StartSession
            | Transition::ConfirmPreferences
            | Transition::ResumeTurn
            | Transition::ContinueTurn
            | Transition::ResumeSwitch => Some(Active),
            Transition::OpenPreferences => Some(ConfiguringPreferences),
            Transition::CancelPreferences
            | Transition::EndTurn
            | Transition::EndPausedTurn
            | Transition::EndSwitch
            | Transition::EndPausedSwitch
            | Transition::Acknowledge => Some(Idle),
            Transition::SwitchTurn => Some(Waiting),
            Transition::FinishSession => Some(Finished),
            Transition::PauseTurn => Some(ActivePaused),
            Transition::PauseSwitch => Some(WaitingPaused),
            Transition::Quit => None,
        }
    }
}

/// Resolve `event` in `state`. `has_more_rounds` is the guard of timer expiry.
pub fn transition(state: ControllerState, event: Event, has_more_rounds: bool) -> Option<Transition> {
    use ControllerState as S;
    use Event as E;

    if event == E::Quit {
        return Some(Transition::Quit);
    }

    match state {
        S::Idle => match event {
            E::Start => Some(Transition::StartSession),
            E::OpenPreferences => Some(Transition::OpenPreferences),
            _ => None,
        },
        S::ConfiguringPreferences => match event {
            E::CancelPreferences => Some(Transition::CancelPreferences),
            E::ConfirmPreferences => Some(Transition::ConfirmPreferences),
            _ => None,
        },
        S::Active => match event {
            E::TimerExpired if has_more_rounds => Some(Transition::SwitchTurn),
            E::TimerExpired => Some(Transition::FinishSession),
            E::Pause => Some(Transition::PauseTurn),
            E::End => Some(Transition::EndTurn),
            _ => None,
        },
        S::ActivePaused => match event {
            E::Resume => Some(Transition::ResumeTurn),
            E::End => Some(Transition::EndPausedTurn),
            _ => None,
        },
        S::Waiting => match event {
            E::Continue => Some(Transition::ContinueTurn),
            E::Pause => Some(Transition::PauseSwitch),
            E::End => Some(Transition::EndSwitch),
            _ => None,
        },
        S::WaitingPaused => match event {
            E::Resume => Some(Transition::ResumeSwitch),
            E::End => Some(Transition::EndPausedSwitch),
            _ => None,
        },
        S::Finished => match event {
            E::Acknowledge => Some(Transition::Acknowledge),
            _ => None,
        },
    }
}

/// Events accepted in `state`
pub fn legal_events(state: ControllerState, has_more_rounds: bool) -> Vec<Event> {
    Event::ALL
        .into_iter()
        .filter(|e| transition(state, *e, has_more_rounds).is_some())
        .collect()
}

/// Concrete event a hotkey stands for in `state`
pub fn hotkey_event(state: ControllerState, hotkey: Hotkey) -> Option<Event> {
    use ControllerState as S;

    match (hotkey, state) {
        (Hotkey::Go, S::Idle) => Some(Event::Start),
        (Hotkey::Go, S::Waiting) => Some(Event::Continue),
        (Hotkey::Go, S::ActivePaused | S::WaitingPaused) => Some(Event::Resume),
        (Hotkey::Go, S::Finished) => Some(Event::Acknowledge),
        (Hotkey::Go, S::Active | S::ConfiguringPreferences) => None,

        (Hotkey::PauseToggle, S::Active | S::Waiting) => Some(Event::Pause),
        (Hotkey::PauseToggle, S::ActivePaused | S::WaitingPaused) => Some(Event::Resume),
        (Hotkey::PauseToggle, S::Idle | S::ConfiguringPreferences | S::Finished) => None,

        (Hotkey::End, S::Active | S::ActivePaused | S::Waiting | S::WaitingPaused) => {
            Some(Event::End)
        }
        (Hotkey::End, S::Finished) => Some(Event::Acknowledge),
        (Hotkey::End, S::Idle | S::ConfiguringPreferences) => None,
    }
}

/// Event behind the continue control and the notification action button
pub fn continue_event(state: ControllerState) -> Option<Event> {
    match state {
        ControllerState::Waiting => Some(Event::Continue),
        ControllerState::Finished => Some(Event::Acknowledge),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("unexpected transition: expected state {expected}, current state {actual}")]
    UnexpectedState {
        expected: ControllerState,
        actual: ControllerState,
    },
    #[error("event {event} is not accepted in state {state}")]
    Rejected {
        event: Event,
        state: ControllerState,
    },
}
