use crate::config::ConfigStore;
use crate::session::SessionConfig;
use crate::util::plural;
use crossterm::event::KeyCode;
use tracing::warn;

pub const MIN_DURATION: u32 = 1;
pub const MAX_DURATION: u32 = 10;
pub const MAX_CYCLES: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Duration,
    Cycles,
}

/// How the dialog was closed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Confirmed,
    Cancelled,
}

/// State of the modal settings dialog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreferencesDialog {
    pub duration: u32,
    pub cycles: u32,
    pub focus: Field,
}

impl PreferencesDialog {
    pub fn new(current: SessionConfig) -> Self {
        Self {
            duration: current.duration_minutes.clamp(MIN_DURATION, MAX_DURATION),
            cycles: current.total_cycles.min(MAX_CYCLES),
            focus: Field::Duration,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Field::Duration => Field::Cycles,
            Field::Cycles => Field::Duration,
        };
    }

    pub fn increase(&mut self) {
        match self.focus {
            Field::Duration => self.duration = (self.duration + 1).min(MAX_DURATION),
            Field::Cycles => self.cycles = (self.cycles + 1).min(MAX_CYCLES),
        }
    }

    pub fn decrease(&mut self) {
        match self.focus {
            Field::Duration => self.duration = self.duration.saturating_sub(1).max(MIN_DURATION),
            Field::Cycles => self.cycles = self.cycles.saturating_sub(1),
        }
    }

    /// Returns how the dialog closed, if the key closed it
    pub fn handle_key(&mut self, code: KeyCode) -> Option<Outcome> {
        match code {
            KeyCode::Enter => return Some(Outcome::Confirmed),
            KeyCode::Esc => return Some(Outcome::Cancelled),
            KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => self.focus_next(),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('l') => self.increase(),
            KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => self.decrease(),
            _ => {}
        }
        None
    }

    pub fn selection(&self) -> SessionConfig {
        SessionConfig::new(self.duration, self.cycles)
    }

    /// Persist the selection; the controller reads it back on confirm
    pub fn apply<C: ConfigStore>(&self, store: &C) {
        if let Err(e) = store.save(&self.selection()) {
            warn!(error = %e, "could not save settings");
        }
    }

    pub fn duration_label(&self) -> String {
        plural(self.duration, "Minute", "Minutes")
    }

    pub fn cycles_label(&self) -> String {
        match self.cycles {
            0 => "Unlimited".to_string(),
            n => plural(n, "Cycle", "Cycles"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    #[test]
    fn test_seeded_from_config() {
        let dialog = PreferencesDialog::new(SessionConfig::new(4, 2));
        assert_eq!(dialog.duration, 4);
        assert_eq!(dialog.cycles, 2);
        assert_eq!(dialog.focus, Field::Duration);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let dialog = PreferencesDialog::new(SessionConfig::new(25, 40));
        assert_eq!(dialog.duration, MAX_DURATION);
        assert_eq!(dialog.cycles, MAX_CYCLES);
    }

    #[test]
    fn test_bounds() {
        let mut dialog = PreferencesDialog::new(SessionConfig::new(1, 0));
        dialog.decrease();
        assert_eq!(dialog.duration, 1);
        dialog.focus_next();
        dialog.decrease();
        assert_eq!(dialog.cycles, 0);
        for _ in 0..20 {
            dialog.increase();
        }
        assert_eq!(dialog.cycles, MAX_CYCLES);
    }

    #[test]
    fn test_labels() {
        let mut dialog = PreferencesDialog::new(SessionConfig::new(1, 0));
        assert_eq!(dialog.duration_label(), "1 Minute");
        assert_eq!(dialog.cycles_label(), "Unlimited");
        dialog.increase();
        dialog.focus_next();
        dialog.increase();
        assert_eq!(dialog.duration_label(), "2 Minutes");
        assert_eq!(dialog.cycles_label(), "1 Cycle");
    }

    #[test]
    fn test_key_handling() {
        let mut dialog = PreferencesDialog::new(SessionConfig::new(3, 0));
        assert_eq!(dialog.handle_key(KeyCode::Right), None);
        assert_eq!(dialog.handle_key(KeyCode::Down), None);
        assert_eq!(dialog.handle_key(KeyCode::Right), None);
        assert_eq!(dialog.selection(), SessionConfig::new(4, 1));
        assert_eq!(dialog.handle_key(KeyCode::Enter), Some(Outcome::Confirmed));
        assert_eq!(dialog.handle_key(KeyCode::Esc), Some(Outcome::Cancelled));
    }

    #[test]
    fn test_apply_persists_selection() {
        let store = MemoryConfigStore::new();
        let mut dialog = PreferencesDialog::new(SessionConfig::default());
        dialog.increase();
        dialog.apply(&store);
        assert_eq!(store.load(), Some(SessionConfig::new(4, 0)));
    }
}
