//! Display sink: the indicator title, its glyph and which menu controls are
//! visible. The controller pushes into it; the renderer reads it back.

use crate::fsm::ControllerState;
use crate::rounds::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IndicatorGlyph {
    #[default]
    Neutral,
    Player1,
    Player2,
}

impl IndicatorGlyph {
    pub fn for_player(player: Player) -> Self {
        match player {
            Player::One => IndicatorGlyph::Player1,
            Player::Two => IndicatorGlyph::Player2,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            IndicatorGlyph::Neutral => "◯",
            IndicatorGlyph::Player1 => "❶",
            IndicatorGlyph::Player2 => "❷",
        }
    }
}

/// Visibility of each menu control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Controls {
    pub quick_start: bool,
    pub custom_start: bool,
    pub continue_ctl: bool,
    pub pause: bool,
    pub resume: bool,
    pub end: bool,
}

impl Controls {
    pub fn for_state(state: ControllerState) -> Self {
        use ControllerState::*;

        match state {
            Idle => Self {
                quick_start: true,
                custom_start: true,
                ..Self::default()
            },
            ConfiguringPreferences => Self {
                quick_start: true,
                ..Self::default()
            },
            Active => Self {
                pause: true,
                end: true,
                ..Self::default()
            },
            ActivePaused | WaitingPaused => Self {
                resume: true,
                end: true,
                ..Self::default()
            },
            Waiting => Self {
                continue_ctl: true,
                pause: true,
                end: true,
                ..Self::default()
            },
            Finished => Self {
                continue_ctl: true,
                ..Self::default()
            },
        }
    }
}

pub trait DisplaySink {
    /// Indicator title; `None` clears it
    fn set_status_text(&mut self, text: Option<&str>);
    fn set_indicator(&mut self, glyph: IndicatorGlyph);
    fn set_controls(&mut self, controls: Controls);
    fn set_preferences_visible(&mut self, visible: bool);
}

/// Last values pushed by the controller
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayModel {
    pub status_text: Option<String>,
    pub indicator: IndicatorGlyph,
    pub controls: Controls,
    pub preferences_visible: bool,
}

impl DisplayModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for DisplayModel {
    fn set_status_text(&mut self, text: Option<&str>) {
        self.status_text = text.map(str::to_owned);
    }

    fn set_indicator(&mut self, glyph: IndicatorGlyph) {
        self.indicator = glyph;
    }

    fn set_controls(&mut self, controls: Controls) {
        self.controls = controls;
    }

    fn set_preferences_visible(&mut self, visible: bool) {
        self.preferences_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_controls_offer_both_starts() {
        let c = Controls::for_state(ControllerState::Idle);
        assert!(c.quick_start && c.custom_start);
        assert!(!c.pause && !c.resume && !c.end && !c.continue_ctl);
    }

    #[test]
    fn test_pause_and_resume_never_both_visible() {
        for state in ControllerState::ALL {
            let c = Controls::for_state(state);
            assert!(!(c.pause && c.resume), "{state}");
        }
    }

    #[test]
    fn test_finished_hides_pause() {
        let c = Controls::for_state(ControllerState::Finished);
        assert!(c.continue_ctl);
        assert!(!c.pause);
    }

    #[test]
    fn test_model_records_last_values() {
        let mut model = DisplayModel::new();
        model.set_status_text(Some("2:59"));
        model.set_indicator(IndicatorGlyph::for_player(Player::Two));
        assert_eq!(model.status_text.as_deref(), Some("2:59"));
        assert_eq!(model.indicator, IndicatorGlyph::Player2);
        model.set_status_text(None);
        assert_eq!(model.status_text, None);
    }
}
