use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::fsm::Hotkey;

/// What a key press asks for. Menu commands name a concrete control;
/// hotkeys are resolved against the current state by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    QuickStart,
    CustomStart,
    Continue,
    Pause,
    Resume,
    End,
    Quit,
    Hotkey(Hotkey),
}

pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('s') => Some(Command::QuickStart),
        KeyCode::Char('c') => Some(Command::CustomStart),
        KeyCode::Char('n') => Some(Command::Continue),
        KeyCode::Char('p') => Some(Command::Pause),
        KeyCode::Char('r') => Some(Command::Resume),
        KeyCode::Char('e') => Some(Command::End),
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Enter => Some(Command::Hotkey(Hotkey::Go)),
        KeyCode::Char(' ') => Some(Command::Hotkey(Hotkey::PauseToggle)),
        KeyCode::Char('x') => Some(Command::Hotkey(Hotkey::End)),
        _ => None,
    }
}

/// Key hints shown under the menu, in display order
pub const HOTKEY_HINTS: [(&str, &str); 3] = [("enter", "go"), ("space", "pause"), ("x", "end")];
