use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};

use crate::parser::config::Config;
use crate::session::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    None,
    Changed,
    Close,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsPanelState {
    pub selected_row: usize,
}

const SETTINGS_ROW_COUNT: usize = 4;

pub fn handle_key(
    key: KeyEvent,
    state: &mut SettingsPanelState,
    config: &mut Config,
) -> SettingsEvent {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => SettingsEvent::Close,
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected_row = state.selected_row.saturating_sub(1);
            SettingsEvent::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.selected_row = (state.selected_row + 1).min(SETTINGS_ROW_COUNT - 1);
            SettingsEvent::None
        }
        KeyCode::Left | KeyCode::Char('h') => adjust(config, state.selected_row),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter | KeyCode::Char(' ') => {
            adjust(config, state.selected_row)
        }
        _ => SettingsEvent::None,
    }
}

pub fn draw(frame: &mut Frame, state: &SettingsPanelState, config: &Config) {
    let area = centered_rect(frame.area(), 56, 44);
    frame.render_widget(Clear, area);

    let title = Line::from(vec![
        Span::styled(
            "Setup",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("[Esc] close", Style::default().fg(Color::Gray)),
    ]);

    let selected_row = state.selected_row.min(SETTINGS_ROW_COUNT - 1);
    let mut lines = vec![
        settings_row(
            selected_row == 0,
            "enzyme labels on map",
            config.show_enzyme_labels,
        ),
        settings_row(
            selected_row == 1,
            "exam point markers",
            config.show_exam_markers,
        ),
        settings_row(selected_row == 2, "reaction sidebar", config.sidebar_visible),
        settings_row(
            selected_row == 3,
            "start in teaching mode",
            config.mode == Mode::Teaching,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "About this option",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    for text in selected_row_description(selected_row) {
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "Use arrows/hjkl or Enter/Space to toggle.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Changes write to config immediately.",
            Style::default().fg(Color::DarkGray),
        )),
    ]);

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(panel, area);
}

pub fn serialize_config(config: &Config) -> String {
    let log_file = config
        .log_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    format!(
        "\
# pathmap configuration
# Edit manually or run: pathmap setup

# Mode the map opens in
# Options: research | teaching
mode: {}

# Milliseconds between reactions during teaching playback
playback_interval_ms: {}

# Milliseconds the camera takes to fly to a focused reaction
recenter_ms: {}

# Draw the catalysing enzyme above each reaction
show_enzyme_labels: {}

# Mark reactions that carry an exam point with a ★
show_exam_markers: {}

# Show the pathway-grouped reaction list beside the map
sidebar_visible: {}

# Log file for the interactive view (empty: pathmap.log in the temp dir)
log_file: {}
",
        config.mode,
        config.playback_interval_ms,
        config.recenter_ms,
        config.show_enzyme_labels,
        config.show_exam_markers,
        config.sidebar_visible,
        log_file
    )
}

fn settings_row(selected: bool, key: &str, enabled: bool) -> Line<'static> {
    let indicator = if selected { ">" } else { " " };
    let base_style = if selected {
        Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let value_text = if enabled { "[ON]" } else { "[OFF]" };
    let mut value_style = if enabled {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::LightRed)
    };
    if selected {
        value_style = value_style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
    } else {
        value_style = value_style.add_modifier(Modifier::BOLD);
    }

    Line::from(vec![
        Span::styled(format!("{indicator} {key:<24}"), base_style),
        Span::styled(value_text, value_style),
    ])
}

fn selected_row_description(selected_row: usize) -> [&'static str; 2] {
    match selected_row {
        0 => [
            "Shows the enzyme name above each reaction line.",
            "Hidden names still appear in tooltips.",
        ],
        1 => [
            "Adds a marker to reactions with an exam point.",
            "The note itself shows only when a reaction is opened.",
        ],
        2 => [
            "Lists reactions grouped by pathway beside the map.",
            "Press [b] in the map to hide it temporarily.",
        ],
        3 => [
            "Opens the map with playback and quiz controls.",
            "Press [m] in the map to switch modes.",
        ],
        _ => ["", ""],
    }
}

fn adjust(config: &mut Config, selected_row: usize) -> SettingsEvent {
    match selected_row {
        0 => {
            config.show_enzyme_labels = !config.show_enzyme_labels;
            SettingsEvent::Changed
        }
        1 => {
            config.show_exam_markers = !config.show_exam_markers;
            SettingsEvent::Changed
        }
        2 => {
            config.sidebar_visible = !config.sidebar_visible;
            SettingsEvent::Changed
        }
        3 => {
            config.mode = config.mode.toggled();
            SettingsEvent::Changed
        }
        _ => SettingsEvent::None,
    }
}

fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    use crate::parser::config;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn toggling_rows_flips_config_values() {
        let mut cfg = Config::default();
        let mut state = SettingsPanelState::default();
        assert_eq!(
            handle_key(press(KeyCode::Enter), &mut state, &mut cfg),
            SettingsEvent::Changed
        );
        assert!(!cfg.show_enzyme_labels);

        for _ in 0..10 {
            handle_key(press(KeyCode::Down), &mut state, &mut cfg);
        }
        assert_eq!(state.selected_row, SETTINGS_ROW_COUNT - 1);
        handle_key(press(KeyCode::Char(' ')), &mut state, &mut cfg);
        assert_eq!(cfg.mode, Mode::Teaching);
        assert_eq!(
            handle_key(press(KeyCode::Esc), &mut state, &mut cfg),
            SettingsEvent::Close
        );
    }

    #[test]
    fn default_config_serializes_to_parseable_text() {
        let text = serialize_config(&Config::default());
        assert!(text.contains("mode: research"));
        assert!(text.contains("log_file: \n"));
        assert_eq!(config::parse(&text).unwrap(), Config::default());
    }
}
