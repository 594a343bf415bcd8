use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use ratatui::{Frame, Terminal};
use tracing::{debug, info};

use crate::highlight::Transition;
use crate::parser::config::Config;
use crate::pathway::PathwayCategory;
use crate::session::{Mode, Session};
use crate::teaching::{MASKED_LABEL, QuizOutcome};
use crate::tooltip::{Tooltip, edge_details, edge_hover, exam_point, node_info};
use crate::tui::input::{self, Action, Direction};
use crate::tui::render::{
    self, CanvasRenderData, PanelFocus, SidebarRow, UNITS_PER_COLUMN, UNITS_PER_ROW,
    centered_rect,
};
use crate::tui::settings::{self, SettingsEvent, SettingsPanelState};

/// Poll interval while the camera is flying.
const ANIMATION_POLL: Duration = Duration::from_millis(30);
const IDLE_POLL: Duration = Duration::from_millis(200);
/// Terminal cells moved per pan keypress.
const PAN_CELLS: f64 = 4.0;
/// World units moved per drag keypress.
const DRAG_STEP: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq)]
enum InfoPanel {
    Node(String),
    EdgeHover(usize),
    EdgeDetails(usize),
    ExamPoint(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingTextKind {
    Search,
    QuizAnswer,
}

#[derive(Debug, Clone)]
struct PendingText {
    title: String,
    buffer: String,
    cursor: usize,
    kind: PendingTextKind,
}

impl PendingText {
    fn new(title: impl Into<String>, kind: PendingTextKind) -> Self {
        Self {
            title: title.into(),
            buffer: String::new(),
            cursor: 0,
            kind,
        }
    }
}

#[derive(Debug)]
struct AppState {
    session: Session,
    config: Config,
    config_path: Option<PathBuf>,
    panel_focus: PanelFocus,
    folded: HashSet<PathwayCategory>,
    row_cursor: usize,
    node_cursor: Option<String>,
    info: Option<InfoPanel>,
    show_help: bool,
    show_settings: bool,
    setup_only: bool,
    settings_state: SettingsPanelState,
    show_sidebar: bool,
    pending_text: Option<PendingText>,
    status_message: Option<String>,
    next_tick: Option<Instant>,
}

impl AppState {
    fn new(
        session: Session,
        config: Config,
        config_path: Option<PathBuf>,
        setup_only: bool,
    ) -> Self {
        let node_cursor = session
            .store()
            .nodes()
            .iter()
            .find(|n| n.position.is_some())
            .map(|n| n.id.clone());
        let show_sidebar = config.sidebar_visible;
        Self {
            session,
            config,
            config_path,
            panel_focus: if show_sidebar {
                PanelFocus::Reactions
            } else {
                PanelFocus::Map
            },
            folded: HashSet::new(),
            row_cursor: 0,
            node_cursor,
            info: None,
            show_help: false,
            show_settings: setup_only,
            setup_only,
            settings_state: SettingsPanelState::default(),
            show_sidebar,
            pending_text: None,
            status_message: None,
            next_tick: None,
        }
    }

    fn sidebar_rows(&self) -> Vec<SidebarRow> {
        let mut rows = Vec::new();
        for group in self.session.groups() {
            let folded = self.folded.contains(&group.category);
            rows.push(SidebarRow::Group {
                category: group.category,
                count: group.count(),
                folded,
            });
            if !folded {
                rows.extend(
                    group
                        .edges
                        .iter()
                        .map(|&stable_index| SidebarRow::Reaction { stable_index }),
                );
            }
        }
        rows
    }

    fn info_tooltip(&self) -> Option<Tooltip> {
        let store = self.session.store();
        let quiz = self.session.quiz();
        match self.info.as_ref()? {
            InfoPanel::Node(id) => {
                let node = store.find_node_by_id(id)?;
                let mut tip = node_info(node);
                if quiz.is_masked(node) {
                    tip.title = MASKED_LABEL.to_string();
                }
                Some(tip)
            }
            InfoPanel::ExamPoint(idx) => {
                let edge = store.edge(*idx)?;
                let mut tip = exam_point(store, edge)?;
                if store.enzyme_for(edge).is_some_and(|n| quiz.is_masked(n)) {
                    mask_enzyme_row(&mut tip);
                }
                Some(tip)
            }
            InfoPanel::EdgeHover(idx) | InfoPanel::EdgeDetails(idx) => {
                let edge = store.edge(*idx)?;
                let mut tip = if matches!(self.info, Some(InfoPanel::EdgeDetails(_))) {
                    edge_details(store, edge)
                } else {
                    edge_hover(store, edge)
                };
                if store.enzyme_for(edge).is_some_and(|n| quiz.is_masked(n)) {
                    mask_enzyme_row(&mut tip);
                }
                Some(tip)
            }
        }
    }

    fn hints(&self) -> String {
        if self.pending_text.is_some() {
            return "typing: [Enter] submit  [Esc] cancel".to_string();
        }
        match (self.panel_focus, self.session.mode()) {
            (PanelFocus::Reactions, Mode::Research) => {
                "[j/k] move  [Enter] focus/fold  [Tab] map  [/] search  [m] teaching".to_string()
            }
            (PanelFocus::Reactions, Mode::Teaching) => {
                "[j/k] move  [Enter] focus/fold  [Space] play  [x] quiz  [r] reset  [m] research"
                    .to_string()
            }
            (PanelFocus::Map, _) if self.session.quiz().is_active() => {
                "[n/N] node  [Enter] answer quiz  [hjkl] pan  [x] end quiz".to_string()
            }
            (PanelFocus::Map, _) => {
                "[n/N] node  [hjkl] pan  [HJKL] drag  [+/-] zoom  [0] reset view".to_string()
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let now = Instant::now();
        let view = self.session.derived_view(now);
        let rows = self.sidebar_rows();
        let info = self.info_tooltip();
        let hints = self.hints();

        let data = CanvasRenderData {
            view: &view,
            store: self.session.store(),
            quiz: self.session.quiz(),
            rows: &rows,
            row_cursor: self.row_cursor,
            node_cursor: self.node_cursor.as_deref(),
            panel_focus: self.panel_focus,
            mode: self.session.mode(),
            playing: self.session.playback().is_playing(),
            playback_step: self.session.playback().step(),
            show_sidebar: self.show_sidebar,
            show_enzyme_labels: self.config.show_enzyme_labels,
            show_exam_markers: self.config.show_exam_markers,
            info: info.as_ref(),
            hints: &hints,
            message: self.status_message.as_deref(),
            show_help: self.show_help,
        };
        render::draw(frame, &data);

        if self.show_settings {
            settings::draw(frame, &self.settings_state, &self.config);
        }
        if let Some(prompt) = &self.pending_text {
            self.draw_text_prompt(frame, prompt);
        }
    }

    fn draw_text_prompt(&self, frame: &mut Frame, prompt: &PendingText) {
        let (placeholder, border_color) = match prompt.kind {
            PendingTextKind::Search => ("name, formula, EC number or exam note...", Color::Cyan),
            PendingTextKind::QuizAnswer => ("enzyme name...", Color::LightRed),
        };
        let mut lines = vec![
            Line::from(Span::styled(
                prompt.title.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        if prompt.kind == PendingTextKind::QuizAnswer
            && let Some(quiz) = self.session.quiz().prompt()
            && let Some(node) = self.session.store().find_node_by_id(&quiz.node_id)
            && let Some(ec) = &node.ec_number
        {
            lines.push(Line::from(Span::styled(
                format!("EC号: {}", ec),
                Style::default().fg(Color::Cyan),
            )));
            lines.push(Line::from(""));
        }
        lines.push(line_with_cursor(
            &prompt.buffer,
            prompt.cursor,
            placeholder,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::DarkGray),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Backspace] delete  [Enter] submit  [Esc] back",
            Style::default().fg(Color::DarkGray),
        )));

        let area = centered_rect(frame.area(), 58, 30);
        frame.render_widget(Clear, area);
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color))
                .padding(Padding::new(1, 1, 1, 0)),
        );
        frame.render_widget(paragraph, area);
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Result<bool> {
        self.status_message = None;

        if self.show_settings {
            let event = settings::handle_key(key, &mut self.settings_state, &mut self.config);
            match event {
                SettingsEvent::Changed => {
                    self.apply_config();
                    self.persist_config()?;
                }
                SettingsEvent::Close => {
                    self.show_settings = false;
                    if self.setup_only {
                        return Ok(true);
                    }
                }
                SettingsEvent::None => {}
            }
            return Ok(false);
        }

        let in_text_mode = self.pending_text.is_some();
        let action = input::action_for_key(key, in_text_mode);
        if in_text_mode {
            self.handle_text_action(action, now);
            return Ok(false);
        }

        match action {
            Action::Quit => return Ok(true),
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::OpenSettings => self.show_settings = true,
            Action::SwitchPanel => {
                if self.show_sidebar {
                    self.panel_focus = match self.panel_focus {
                        PanelFocus::Reactions => PanelFocus::Map,
                        PanelFocus::Map => PanelFocus::Reactions,
                    };
                }
            }
            Action::Move(direction) => match self.panel_focus {
                PanelFocus::Reactions => self.move_row_cursor(direction),
                PanelFocus::Map => self.pan(direction),
            },
            Action::Drag(direction) => self.drag_cursor_node(direction),
            Action::NextNode => self.cycle_node(1),
            Action::PrevNode => self.cycle_node(-1),
            Action::ExamPoint => self.show_exam_point(),
            Action::Activate => match self.panel_focus {
                PanelFocus::Reactions => self.activate_row(now),
                PanelFocus::Map => self.activate_node(),
            },
            Action::ZoomIn => self.session.camera_mut().zoom_in(now),
            Action::ZoomOut => self.session.camera_mut().zoom_out(now),
            Action::ResetView => self.session.camera_mut().reset(now),
            Action::ToggleMode => {
                let mode = self.session.mode().toggled();
                self.session.switch_mode(mode, now);
                self.info = None;
                self.next_tick = None;
                self.status_message = Some(format!("{} mode", mode));
            }
            Action::TogglePlay => {
                if self.session.toggle_playback() {
                    self.next_tick = Some(now);
                    self.status_message = Some("playback started".to_string());
                } else if self.session.mode() == Mode::Teaching {
                    self.next_tick = None;
                    self.status_message = Some("playback paused".to_string());
                } else {
                    self.status_message =
                        Some("playback needs teaching mode, press [m]".to_string());
                }
            }
            Action::ResetTeaching => {
                self.session.reset(now);
                self.info = None;
                self.next_tick = None;
                self.status_message = Some("reset".to_string());
            }
            Action::ToggleQuiz => {
                if self.session.toggle_quiz() {
                    self.panel_focus = PanelFocus::Map;
                    self.status_message =
                        Some("quiz: pick an enzyme node with [n] and press [Enter]".to_string());
                } else if self.session.mode() == Mode::Teaching {
                    self.status_message = Some("quiz closed".to_string());
                } else {
                    self.status_message = Some("quiz needs teaching mode, press [m]".to_string());
                }
            }
            Action::StartSearch => {
                self.pending_text = Some(PendingText::new("Search", PendingTextKind::Search));
            }
            Action::ToggleSidebar => {
                self.show_sidebar = !self.show_sidebar;
                if !self.show_sidebar {
                    self.panel_focus = PanelFocus::Map;
                }
            }
            Action::FoldAll => {
                let categories = self
                    .session
                    .groups()
                    .iter()
                    .map(|g| g.category)
                    .collect::<Vec<_>>();
                if categories.iter().all(|c| self.folded.contains(c)) {
                    self.folded.clear();
                } else {
                    self.folded.extend(categories);
                }
                self.clamp_row_cursor();
            }
            Action::Cancel => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.session.clear();
                    self.session.clear_search();
                    self.info = None;
                }
            }
            Action::SubmitText | Action::Backspace | Action::InputChar(_) | Action::Noop => {}
        }
        Ok(false)
    }

    fn handle_text_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::SubmitText => {
                if let Some(prompt) = self.pending_text.take() {
                    self.apply_text_prompt(prompt, now);
                }
            }
            Action::Cancel => {
                if let Some(prompt) = self.pending_text.take()
                    && prompt.kind == PendingTextKind::QuizAnswer
                {
                    self.session.cancel_quiz();
                }
            }
            Action::Backspace => {
                if let Some(prompt) = &mut self.pending_text
                    && prompt.cursor > 0
                {
                    let from = byte_index_for_cursor(&prompt.buffer, prompt.cursor - 1);
                    let to = byte_index_for_cursor(&prompt.buffer, prompt.cursor);
                    prompt.buffer.replace_range(from..to, "");
                    prompt.cursor -= 1;
                }
            }
            Action::InputChar(c) => {
                if let Some(prompt) = &mut self.pending_text {
                    let at = byte_index_for_cursor(&prompt.buffer, prompt.cursor);
                    prompt.buffer.insert(at, c);
                    prompt.cursor += 1;
                }
            }
            Action::Move(Direction::Left) => {
                if let Some(prompt) = &mut self.pending_text {
                    prompt.cursor = prompt.cursor.saturating_sub(1);
                }
            }
            Action::Move(Direction::Right) => {
                if let Some(prompt) = &mut self.pending_text {
                    let max = prompt.buffer.chars().count();
                    prompt.cursor = (prompt.cursor + 1).min(max);
                }
            }
            _ => {}
        }
    }

    fn apply_text_prompt(&mut self, prompt: PendingText, now: Instant) {
        match prompt.kind {
            PendingTextKind::Search => {
                let results = self.session.search(&prompt.buffer, now);
                if results.is_empty() {
                    self.status_message = if prompt.buffer.trim().is_empty() {
                        Some("search cleared".to_string())
                    } else {
                        Some(format!("no matches for {:?}", prompt.buffer.trim()))
                    };
                    return;
                }
                let message = format!(
                    "{} nodes, {} reactions, {} related",
                    results.nodes.len(),
                    results.edges.len(),
                    results.related_edges.len()
                );
                let first_node = results.nodes.first().cloned();
                debug!(query = %prompt.buffer, "search");
                if let Some(id) = first_node {
                    self.info = Some(InfoPanel::Node(id.clone()));
                    self.node_cursor = Some(id);
                }
                self.status_message = Some(message);
            }
            PendingTextKind::QuizAnswer => {
                let Some(outcome) = self.session.submit_quiz(&prompt.buffer) else {
                    return;
                };
                debug!(correct = outcome.is_correct(), "quiz answer");
                self.report_quiz(outcome);
            }
        }
    }

    fn report_quiz(&mut self, outcome: QuizOutcome) {
        match outcome {
            QuizOutcome::Correct { node_id } => {
                let name = self
                    .session
                    .store()
                    .find_node_by_id(&node_id)
                    .map(|n| n.display_name.clone())
                    .unwrap_or(node_id);
                self.status_message = Some(format!("correct: {}", name));
            }
            QuizOutcome::Incorrect { expected, .. } => {
                self.status_message = Some(format!("not quite, it is {}", expected));
            }
        }
    }

    fn move_row_cursor(&mut self, direction: Direction) {
        let len = self.sidebar_rows().len();
        match direction {
            Direction::Up => self.row_cursor = self.row_cursor.saturating_sub(1),
            Direction::Down => self.row_cursor = (self.row_cursor + 1).min(len.saturating_sub(1)),
            Direction::Left | Direction::Right => return,
        }
        self.hover_row();
    }

    /// Moving onto a reaction row shows its hover info.
    fn hover_row(&mut self) {
        let Some(SidebarRow::Reaction { stable_index }) =
            self.sidebar_rows().get(self.row_cursor).copied()
        else {
            return;
        };
        self.info = if self.session.highlight().is_focused(stable_index) {
            Some(InfoPanel::EdgeDetails(stable_index))
        } else {
            Some(InfoPanel::EdgeHover(stable_index))
        };
    }

    fn clamp_row_cursor(&mut self) {
        let len = self.sidebar_rows().len();
        self.row_cursor = self.row_cursor.min(len.saturating_sub(1));
    }

    fn activate_row(&mut self, now: Instant) {
        match self.sidebar_rows().get(self.row_cursor).copied() {
            Some(SidebarRow::Group { category, .. }) => {
                if !self.folded.remove(&category) {
                    self.folded.insert(category);
                }
                self.clamp_row_cursor();
            }
            Some(SidebarRow::Reaction { stable_index }) => {
                match self.session.select(stable_index, now) {
                    Transition::Focused { index, .. } => {
                        self.info = Some(InfoPanel::EdgeDetails(index));
                    }
                    Transition::Cleared { previous } => {
                        self.info = Some(InfoPanel::EdgeHover(previous));
                    }
                    Transition::Unchanged => {}
                }
            }
            None => {}
        }
    }

    fn show_exam_point(&mut self) {
        let Some(index) = self.session.highlight().focused() else {
            self.status_message = Some("focus a reaction first".to_string());
            return;
        };
        let has_note = self
            .session
            .store()
            .edge(index)
            .is_some_and(|e| e.exam_note.is_some());
        if has_note {
            self.info = Some(InfoPanel::ExamPoint(index));
        } else {
            self.status_message = Some("no exam point for this reaction".to_string());
        }
    }

    fn placed_node_ids(&self) -> Vec<String> {
        self.session
            .store()
            .nodes()
            .iter()
            .filter(|n| n.position.is_some())
            .map(|n| n.id.clone())
            .collect()
    }

    fn cycle_node(&mut self, step: isize) {
        let ids = self.placed_node_ids();
        if ids.is_empty() {
            return;
        }
        let len = ids.len() as isize;
        let current = match self
            .node_cursor
            .as_ref()
            .and_then(|id| ids.iter().position(|n| n == id))
        {
            Some(i) => i as isize,
            None if step > 0 => -1,
            None => 0,
        };
        let next = (current + step).rem_euclid(len) as usize;
        let id = ids[next].clone();
        self.info = Some(InfoPanel::Node(id.clone()));
        self.node_cursor = Some(id);
    }

    fn activate_node(&mut self) {
        let Some(id) = self.node_cursor.clone() else {
            return;
        };
        if self.session.quiz().is_active() {
            if self.session.ask_quiz(&id).is_some() {
                self.pending_text = Some(PendingText::new(
                    "Name this enzyme",
                    PendingTextKind::QuizAnswer,
                ));
            } else {
                self.status_message = Some("only enzymes can be quizzed".to_string());
            }
            return;
        }
        self.info = Some(InfoPanel::Node(id));
    }

    fn pan(&mut self, direction: Direction) {
        let zoom = self.session.camera().zoom();
        let dx = PAN_CELLS * UNITS_PER_COLUMN / zoom;
        let dy = PAN_CELLS * UNITS_PER_ROW / zoom / 2.0;
        let (dx, dy) = match direction {
            Direction::Left => (-dx, 0.0),
            Direction::Right => (dx, 0.0),
            Direction::Up => (0.0, -dy),
            Direction::Down => (0.0, dy),
        };
        self.session.camera_mut().pan(dx, dy);
    }

    fn drag_cursor_node(&mut self, direction: Direction) {
        let Some(id) = self.node_cursor.clone() else {
            return;
        };
        let (dx, dy) = match direction {
            Direction::Left => (-DRAG_STEP, 0.0),
            Direction::Right => (DRAG_STEP, 0.0),
            Direction::Up => (0.0, -DRAG_STEP),
            Direction::Down => (0.0, DRAG_STEP),
        };
        self.session.drag_node(&id, dx, dy);
    }

    /// Advance playback when its timer is due.
    fn on_tick(&mut self, now: Instant) {
        let Some(due) = self.next_tick else {
            return;
        };
        if now < due {
            return;
        }
        match self.session.tick_playback(now) {
            Some(index) => {
                self.info = Some(InfoPanel::EdgeDetails(index));
                self.next_tick = Some(now + self.config.playback_interval());
            }
            None => {
                self.next_tick = None;
                if !self.session.playback().is_playing() {
                    self.status_message = Some("playback finished".to_string());
                }
            }
        }
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        if self.session.camera().is_moving(now) {
            return ANIMATION_POLL;
        }
        match self.next_tick {
            Some(due) => due.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    fn apply_config(&mut self) {
        self.show_sidebar = self.config.sidebar_visible;
        if !self.show_sidebar {
            self.panel_focus = PanelFocus::Map;
        }
    }

    fn persist_config(&self) -> Result<()> {
        if let Some(path) = &self.config_path {
            fs::write(path, settings::serialize_config(&self.config))?;
        }
        Ok(())
    }
}

pub fn run(
    session: Session,
    config: Config,
    config_path: Option<PathBuf>,
    setup_only: bool,
) -> Result<()> {
    let mut app = AppState::new(session, config, config_path, setup_only);
    info!(mode = %app.session.mode(), setup_only, "starting tui");

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.on_tick(Instant::now());
        terminal.draw(|f| app.draw(f))?;
        if !event::poll(app.poll_timeout(Instant::now()))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                continue;
            }
            if app.handle_key(key, Instant::now())? {
                break;
            }
        }
    }
    Ok(())
}

fn mask_enzyme_row(tip: &mut Tooltip) {
    for (key, value) in tip.rows.iter_mut() {
        if *key == "酶" {
            *value = MASKED_LABEL.to_string();
        }
    }
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn line_with_cursor(
    text: &str,
    cursor: usize,
    placeholder: &str,
    text_style: Style,
    placeholder_style: Style,
    caret_style: Style,
) -> Line<'static> {
    let mut spans = Vec::new();
    let char_len = text.chars().count();
    let clamped = cursor.min(char_len);

    if char_len == 0 {
        spans.push(Span::styled("▌", caret_style));
        if !placeholder.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(placeholder.to_string(), placeholder_style));
        }
        return Line::from(spans);
    }

    let split = byte_index_for_cursor(text, clamped);
    let (left, right) = text.split_at(split);
    if !left.is_empty() {
        spans.push(Span::styled(left.to_string(), text_style));
    }
    spans.push(Span::styled("▌", caret_style));
    if !right.is_empty() {
        spans.push(Span::styled(right.to_string(), text_style));
    }
    Line::from(spans)
}

fn byte_index_for_cursor(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    use crate::parser::dataset;

    fn app(mode: Mode) -> AppState {
        let config = Config {
            mode,
            ..Config::default()
        };
        let session = Session::initialize(&dataset::embedded().unwrap(), &config).unwrap();
        AppState::new(session, config, None, false)
    }

    fn press(app: &mut AppState, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now())
            .unwrap()
    }

    fn first_reaction_row(app: &AppState) -> usize {
        app.sidebar_rows()
            .iter()
            .position(|r| matches!(r, SidebarRow::Reaction { .. }))
            .expect("sidebar lists reactions")
    }

    #[test]
    fn enter_on_reaction_row_focuses_and_shows_details() {
        let mut app = app(Mode::Research);
        app.row_cursor = first_reaction_row(&app);
        let Some(SidebarRow::Reaction { stable_index }) =
            app.sidebar_rows().get(app.row_cursor).copied()
        else {
            panic!("cursor should sit on a reaction");
        };

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.highlight().focused(), Some(stable_index));
        assert_eq!(app.info, Some(InfoPanel::EdgeDetails(stable_index)));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.highlight().focused(), None);
        assert_eq!(app.info, Some(InfoPanel::EdgeHover(stable_index)));
    }

    #[test]
    fn folding_a_group_hides_its_reactions() {
        let mut app = app(Mode::Research);
        let before = app.sidebar_rows().len();
        app.row_cursor = 0;
        press(&mut app, KeyCode::Enter);
        let after = app.sidebar_rows().len();
        let first_count = app.session.groups()[0].count();
        assert_eq!(after, before - first_count);

        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.sidebar_rows().len(), app.session.groups().len());
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.sidebar_rows().len(), before);
    }

    #[test]
    fn hover_tooltip_never_carries_exam_note() {
        let mut app = app(Mode::Research);
        app.info = Some(InfoPanel::EdgeHover(0));
        assert_eq!(app.info_tooltip().unwrap().value("考点"), None);
        app.info = Some(InfoPanel::EdgeDetails(0));
        assert_eq!(app.info_tooltip().unwrap().value("考点"), Some("关键限速步骤"));
    }

    #[test]
    fn exam_point_needs_a_focused_reaction() {
        let mut app = app(Mode::Research);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.info, None);
        assert!(app.status_message.is_some());

        app.session.select(0, Instant::now());
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.info, Some(InfoPanel::ExamPoint(0)));
        let tip = app.info_tooltip().unwrap();
        assert_eq!(tip.title, "考点提示");
        assert_eq!(tip.value("考点"), Some("关键限速步骤"));
    }

    #[test]
    fn playback_ticks_on_its_interval() {
        let mut app = app(Mode::Teaching);
        let start = Instant::now();
        app.handle_key(
            KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE),
            start,
        )
        .unwrap();
        app.on_tick(start);
        assert_eq!(app.session.highlight().focused(), Some(0));

        app.on_tick(start + Duration::from_millis(10));
        assert_eq!(app.session.highlight().focused(), Some(0), "not due yet");

        app.on_tick(start + app.config.playback_interval());
        assert_eq!(app.session.highlight().focused(), Some(1));
    }

    #[test]
    fn quiz_masks_enzyme_names_until_answered() {
        let mut app = app(Mode::Teaching);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.panel_focus, PanelFocus::Map);

        app.node_cursor = Some("pfk".to_string());
        app.info = Some(InfoPanel::Node("pfk".to_string()));
        assert_eq!(app.info_tooltip().unwrap().title, MASKED_LABEL);

        press(&mut app, KeyCode::Enter);
        assert!(app.pending_text.is_some());
        for c in " 磷酸果糖激酶 ".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.pending_text.is_none());
        assert_eq!(app.info_tooltip().unwrap().title, "磷酸果糖激酶");
    }

    #[test]
    fn search_prompt_moves_node_cursor_to_first_match() {
        let mut app = app(Mode::Research);
        press(&mut app, KeyCode::Char('/'));
        for c in "c6h12o6".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.node_cursor.as_deref(), Some("glucose"));
        assert!(!app.session.search_results().is_empty());

        press(&mut app, KeyCode::Esc);
        assert!(app.session.search_results().is_empty());
    }

    #[test]
    fn shift_arrow_drags_cursor_node() {
        let mut app = app(Mode::Research);
        app.node_cursor = Some("glucose".to_string());
        app.handle_key(
            KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT),
            Instant::now(),
        )
        .unwrap();
        let glucose = app.session.store().find_node_by_id("glucose").unwrap();
        assert_eq!(glucose.position.map(|p| p.x), Some(100.0 + DRAG_STEP));
    }

    #[test]
    fn setup_only_quits_when_settings_close() {
        let config = Config::default();
        let session = Session::initialize(&dataset::embedded().unwrap(), &config).unwrap();
        let mut app = AppState::new(session, config, None, true);
        assert!(app.show_settings);
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[test]
    fn cursor_byte_index_handles_multibyte_text() {
        assert_eq!(byte_index_for_cursor("葡萄糖", 1), 3);
        assert_eq!(byte_index_for_cursor("葡萄糖", 9), 9);
    }
}
