use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::alerts::AlertSink;
use crate::app::App;
use crate::config::ConfigStore;
use crate::display::IndicatorGlyph;
use crate::fsm::ControllerState;
use crate::keymap::HOTKEY_HINTS;
use crate::preferences::{Field, PreferencesDialog};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

fn glyph_style(glyph: IndicatorGlyph) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match glyph {
        IndicatorGlyph::Neutral => bold.add_modifier(Modifier::DIM),
        IndicatorGlyph::Player1 => bold.fg(Color::Cyan),
        IndicatorGlyph::Player2 => bold.fg(Color::Magenta),
    }
}

fn menu_line(key: &str, label: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("[{key}] "),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(label),
    ])
}

impl<C: ConfigStore + Clone, A: AlertSink> Widget for &App<C, A> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = self.display();
        let controller = &self.controller;
        let state = controller.state();

        let block = Block::default().borders(Borders::ALL).title(" alternate ");
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // indicator
                Constraint::Length(2), // status line + started at
                Constraint::Min(0),    // menu
                Constraint::Length(1), // hotkey hints
            ])
            .split(inner);

        let mut title = vec![Span::styled(
            display.indicator.symbol(),
            glyph_style(display.indicator),
        )];
        if let Some(text) = display.status_text.as_deref() {
            let style = match state {
                ControllerState::Waiting | ControllerState::Finished => Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
                _ if state.is_paused() => Style::default().add_modifier(Modifier::DIM),
                _ => Style::default().add_modifier(Modifier::BOLD),
            };
            title.push(Span::raw(" "));
            title.push(Span::styled(text.to_string(), style));
        }
        if state.is_paused() {
            title.push(Span::styled(
                "  (paused)",
                Style::default().add_modifier(Modifier::ITALIC),
            ));
        }
        Paragraph::new(Line::from(title))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let mut status = vec![Line::from(controller.status_line())];
        if let Some(started) = self.session_started {
            status.push(Line::styled(
                format!("started at {}", started.format("%H:%M")),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let controls = display.controls;
        let mut menu = Vec::new();
        if controls.quick_start {
            menu.push(menu_line("s", controller.start_label()));
        }
        if controls.custom_start {
            menu.push(menu_line("c", "Custom start...".to_string()));
        }
        if controls.continue_ctl {
            if let Some(label) = controller.continue_label() {
                menu.push(menu_line("n", label));
            }
        }
        if controls.pause {
            menu.push(menu_line("p", "Pause".to_string()));
        }
        if controls.resume {
            menu.push(menu_line("r", "Resume".to_string()));
        }
        if controls.end {
            menu.push(menu_line("e", "End".to_string()));
        }
        menu.push(menu_line("q", "Quit".to_string()));
        Paragraph::new(menu).render(chunks[2], buf);

        let hints = HOTKEY_HINTS
            .iter()
            .map(|(key, action)| format!("{key} {action}"))
            .join(" · ");
        Paragraph::new(Span::styled(
            hints,
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        if let Some(dialog) = &self.preferences {
            dialog.render(area, buf);
        }
    }
}

fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

impl Widget for &PreferencesDialog {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = [
            (Field::Duration, "Duration", self.duration_label()),
            (Field::Cycles, "Rounds", self.cycles_label()),
        ];
        let footer = "←/→ change · ↑/↓ field · enter start · esc cancel";

        let lines: Vec<Line> = rows
            .iter()
            .map(|(field, name, value)| {
                let selected = *field == self.focus;
                let value_style = if selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::raw(format!("{name:>9}: ")),
                    Span::styled(format!("‹ {value} ›"), value_style),
                ])
            })
            .chain([
                Line::raw(""),
                Line::styled(footer, Style::default().add_modifier(Modifier::DIM)),
            ])
            .collect();

        let width = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.width()).sum::<usize>())
            .max()
            .unwrap_or(0) as u16
            + 4;
        let popup = centered_rect(width, lines.len() as u16 + 2, area);

        Clear.render(popup, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Custom start ")
                    .style(Style::default().fg(Color::White)),
            )
            .render(popup, buf);
    }
}

pub fn draw<C: ConfigStore + Clone, A: AlertSink>(app: &App<C, A>, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::RecordingAlerts;
    use crate::config::MemoryConfigStore;
    use crate::session::SessionConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn create_test_app(duration: u32, cycles: u32) -> App<MemoryConfigStore, RecordingAlerts> {
        App::new(
            MemoryConfigStore::with_config(SessionConfig::new(duration, cycles)),
            RecordingAlerts::new(),
        )
    }

    fn rendered(app: &App<MemoryConfigStore, RecordingAlerts>, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn press(app: &mut App<MemoryConfigStore, RecordingAlerts>, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_idle_screen() {
        let app = create_test_app(3, 2);
        let content = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(content.contains("Not Running"));
        assert!(content.contains("Start 2 rounds of 3 minutes"));
        assert!(content.contains("Custom start"));
        assert!(!content.contains("Pause"));
    }

    #[test]
    fn test_active_screen() {
        let mut app = create_test_app(3, 0);
        press(&mut app, KeyCode::Char('s'));
        let content = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(content.contains("3:00"));
        assert!(content.contains("Round 1, player 1"));
        assert!(content.contains("Pause"));
        assert!(content.contains("started at"));
    }

    #[test]
    fn test_waiting_screen() {
        let mut app = create_test_app(1, 0);
        press(&mut app, KeyCode::Char('s'));
        for _ in 0..60 {
            app.on_tick();
        }
        let content = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(content.contains("Switch!"));
        assert!(content.contains("Continue (Player 2)"));
    }

    #[test]
    fn test_preferences_popup() {
        let mut app = create_test_app(3, 0);
        press(&mut app, KeyCode::Char('c'));
        let content = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(content.contains("3 Minutes"));
        assert!(content.contains("Unlimited"));
    }

    #[test]
    fn test_small_area() {
        let app = create_test_app(3, 0);
        let area = Rect::new(0, 0, 20, 5);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn test_draw_through_terminal() {
        let app = create_test_app(3, 0);
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("alternate"));
    }
}
