use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::graph::model::Point;
use crate::graph::store::EntityStore;
use crate::highlight::{OPACITY_DIM_EDGE, OPACITY_FULL};
use crate::pathway::PathwayCategory;
use crate::session::Mode;
use crate::teaching::Quiz;
use crate::tooltip::Tooltip;
use crate::view::{DerivedView, EdgeView, STROKE_WIDTH, StrokeColor};

/// World units covered by one terminal column at zoom 1.
pub const UNITS_PER_COLUMN: f64 = 10.0;
/// World units covered by one terminal row at zoom 1. Cells are about twice
/// as tall as they are wide.
pub const UNITS_PER_ROW: f64 = 20.0;
const DASH_UNITS: f64 = 12.0;
const EXAM_MARKER: &str = "★";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Reactions,
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarRow {
    Group {
        category: PathwayCategory,
        count: usize,
        folded: bool,
    },
    Reaction {
        stable_index: usize,
    },
}

#[derive(Debug)]
pub struct CanvasRenderData<'a> {
    pub view: &'a DerivedView,
    pub store: &'a EntityStore,
    pub quiz: &'a Quiz,
    pub rows: &'a [SidebarRow],
    pub row_cursor: usize,
    pub node_cursor: Option<&'a str>,
    pub panel_focus: PanelFocus,
    pub mode: Mode,
    pub playing: bool,
    pub playback_step: usize,
    pub show_sidebar: bool,
    pub show_enzyme_labels: bool,
    pub show_exam_markers: bool,
    pub info: Option<&'a Tooltip>,
    pub hints: &'a str,
    pub message: Option<&'a str>,
    pub show_help: bool,
}

pub fn draw(frame: &mut Frame, data: &CanvasRenderData<'_>) {
    let area = frame.area().inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let mode_color = match data.mode {
        Mode::Research => Color::Cyan,
        Mode::Teaching => Color::Magenta,
    };
    let mut title_spans = vec![
        Span::styled("pathmap", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", data.mode),
            Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("[q] quit", Style::default().fg(Color::DarkGray)),
    ];
    if data.playing {
        title_spans.push(Span::raw("  "));
        title_spans.push(Span::styled(
            format!(
                "▶ PLAYING {}/{}",
                data.playback_step,
                data.store.edges_in_order().len()
            ),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }
    if data.quiz.is_active() {
        title_spans.push(Span::raw("  "));
        title_spans.push(Span::styled(
            "QUIZ",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ));
    }
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Line::from(title_spans));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [panes_area, status_area] =
        Layout::vertical([Constraint::Min(6), Constraint::Length(4)]).areas(inner);

    let map_outer = if data.show_sidebar {
        let [sidebar_outer, map_outer] =
            Layout::horizontal([Constraint::Percentage(34), Constraint::Fill(1)]).areas(panes_area);
        draw_sidebar(frame, data, sidebar_outer);
        map_outer
    } else {
        panes_area
    };

    let info_height = data
        .info
        .map(|tip| tip.rows.len() as u16 + 3)
        .unwrap_or(0);
    let [map_area, info_area] =
        Layout::vertical([Constraint::Min(4), Constraint::Length(info_height)]).areas(map_outer);
    draw_map(frame, data, map_area);
    if let Some(tip) = data.info {
        draw_info(frame, tip, info_area);
    }

    draw_status(frame, data, status_area);

    if data.show_help {
        render_help_overlay(frame);
    }
}

fn panel_block(title: &str, focused: bool, extra: String) -> Block<'static> {
    let (border, title_style) = if focused {
        (
            Style::default().fg(Color::White),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Line::from(vec![
            Span::styled(title.to_string(), title_style),
            Span::raw("  "),
            Span::styled(extra, Style::default().fg(Color::DarkGray)),
        ]))
}

fn draw_sidebar(frame: &mut Frame, data: &CanvasRenderData<'_>, area: Rect) {
    let focused = data.panel_focus == PanelFocus::Reactions;
    let block = panel_block(
        "REACTIONS",
        focused,
        format!("{} total", data.store.edges_in_order().len()),
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let lines = data
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| sidebar_line(data, row, focused && idx == data.row_cursor, width))
        .collect::<Vec<_>>();

    let visible = inner.height as usize;
    let scroll = if visible == 0 {
        0
    } else {
        data.row_cursor.saturating_sub(visible.saturating_sub(1))
    };
    let list = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(list, inner);
}

fn sidebar_line(
    data: &CanvasRenderData<'_>,
    row: &SidebarRow,
    at_cursor: bool,
    width: usize,
) -> Line<'static> {
    let prefix = if at_cursor { ">" } else { " " };
    match *row {
        SidebarRow::Group {
            category,
            count,
            folded,
        } => {
            let fold = if folded { "▸" } else { "▾" };
            let mut style = Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
            if at_cursor {
                style = style.bg(Color::DarkGray);
            }
            Line::from(Span::styled(
                format!("{} {} {} ({})", prefix, fold, category.title(), count),
                style,
            ))
        }
        SidebarRow::Reaction { stable_index } => {
            let Some(edge) = data.store.edge(stable_index) else {
                return Line::from("");
            };
            let edge_view = data.view.edge(stable_index);
            let emphasized = edge_view.is_some_and(|e| e.emphasized);
            let search_match = edge_view.is_some_and(|e| e.search_match);

            let mut text = format!("{}   {}", prefix, edge.label);
            if let Some(enzyme) = enzyme_text(data, stable_index) {
                text.push_str(&format!(" [{}]", enzyme));
            }
            if data.show_exam_markers && edge.exam_note.is_some() {
                text.push(' ');
                text.push_str(EXAM_MARKER);
            }
            let mut style = if emphasized {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD)
            } else if search_match {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            if at_cursor && !emphasized {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(truncate_text(&text, width), style))
        }
    }
}

/// Enzyme name for a reaction, masked while the quiz hides it.
fn enzyme_text(data: &CanvasRenderData<'_>, stable_index: usize) -> Option<String> {
    let edge = data.store.edge(stable_index)?;
    if let Some(node) = data.store.enzyme_for(edge) {
        return Some(data.quiz.label_for(node).to_string());
    }
    data.store.enzyme_label(edge).map(str::to_string)
}

struct MapLabel {
    at: Point,
    text: String,
    style: Style,
}

fn draw_map(frame: &mut Frame, data: &CanvasRenderData<'_>, area: Rect) {
    let camera = data.view.camera;
    let block = panel_block(
        "MAP",
        data.panel_focus == PanelFocus::Map,
        format!("zoom {:.2}", camera.zoom),
    );
    let inner = block.inner(area);

    let half_w = f64::from(inner.width.max(1)) * UNITS_PER_COLUMN / camera.zoom / 2.0;
    let half_h = f64::from(inner.height.max(1)) * UNITS_PER_ROW / camera.zoom / 2.0;
    let center = camera.center;

    // Offset between the parallel lines of a wide stroke: half a column.
    let unit = half_w / f64::from(inner.width.max(1));
    let mut segments = Vec::new();
    let mut labels = Vec::new();
    for edge in &data.view.edges {
        if let Some((from, to)) = edge.endpoints {
            push_edge_segments(&mut segments, edge, from, to, unit);
        }
    }

    if data.show_enzyme_labels {
        for label in &data.view.enzyme_labels {
            let Some(anchor) = label.anchor else {
                continue;
            };
            let text = enzyme_text(data, label.stable_index).unwrap_or_default();
            let style = if label.emphasized {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(tier_color(Color::Gray, label.opacity))
            };
            labels.push(MapLabel {
                at: anchor,
                text,
                style,
            });
        }
    }

    if data.show_exam_markers {
        for edge in data.store.edges_in_order() {
            if edge.exam_note.is_none() {
                continue;
            }
            let Some((from, to)) = data.view.edge(edge.stable_index).and_then(|e| e.endpoints)
            else {
                continue;
            };
            let mid = from.midpoint(to);
            labels.push(MapLabel {
                at: Point::new(mid.x, mid.y + UNITS_PER_ROW / camera.zoom),
                text: EXAM_MARKER.to_string(),
                style: Style::default().fg(Color::Yellow),
            });
        }
    }

    for node_view in &data.view.nodes {
        let (Some(position), Some(node)) =
            (node_view.position, data.store.find_node_by_id(&node_view.id))
        else {
            continue;
        };
        let mut style = if node_view.emphasized {
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD)
        } else if node.is_enzyme() {
            Style::default().fg(tier_color(Color::LightMagenta, node_view.opacity))
        } else {
            Style::default().fg(tier_color(Color::White, node_view.opacity))
        };
        if node_view.search_match {
            style = style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);
        }
        if data.node_cursor == Some(node.id.as_str()) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if node.is_enzyme() {
            labels.push(MapLabel {
                at: position,
                text: data.quiz.label_for(node).to_string(),
                style,
            });
            continue;
        }
        // Metabolites show the formula with the name one row below.
        labels.push(MapLabel {
            at: position,
            text: node.map_label().to_string(),
            style,
        });
        labels.push(MapLabel {
            at: Point::new(position.x, position.y + UNITS_PER_ROW / camera.zoom),
            text: node.display_name.clone(),
            style: Style::default().fg(tier_color(Color::Gray, node_view.opacity)),
        });
    }

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([center.x - half_w, center.x + half_w])
        .y_bounds([-(center.y + half_h), -(center.y - half_h)])
        .paint(move |ctx: &mut Context<'_>| {
            for segment in &segments {
                ctx.draw(segment);
            }
            ctx.layer();
            for label in &labels {
                ctx.print(
                    label.at.x,
                    -label.at.y,
                    Span::styled(label.text.clone(), label.style),
                );
            }
        });
    frame.render_widget(canvas, area);
}

/// Canvas y grows upward while dataset y grows downward, so y is negated.
fn push_edge_segments(
    out: &mut Vec<CanvasLine>,
    edge: &EdgeView,
    from: Point,
    to: Point,
    unit: f64,
) {
    let color = match edge.stroke {
        StrokeColor::Highlight => Color::Red,
        StrokeColor::Synthesis => tier_color(Color::Rgb(0x34, 0x98, 0xdb), edge.opacity),
        StrokeColor::Decomposition => tier_color(Color::Rgb(0xe7, 0x4c, 0x3c), edge.opacity),
        // Black is invisible on most terminal themes.
        StrokeColor::Neutral => tier_color(Color::White, edge.opacity),
    };

    let offsets: &[f64] = if edge.stroke_width > STROKE_WIDTH {
        &[-1.0, 0.0, 1.0]
    } else {
        &[0.0]
    };
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return;
    }
    let (nx, ny) = (-dy / len * unit, dx / len * unit);

    for &k in offsets {
        let a = Point::new(from.x + nx * k, from.y + ny * k);
        let b = Point::new(to.x + nx * k, to.y + ny * k);
        if edge.dashed {
            let dashes = (len / DASH_UNITS).ceil().max(1.0) as usize;
            for i in (0..dashes).step_by(2) {
                let s = a.lerp(b, i as f64 / dashes as f64);
                let e = a.lerp(b, ((i + 1) as f64 / dashes as f64).min(1.0));
                out.push(CanvasLine::new(s.x, -s.y, e.x, -e.y, color));
            }
        } else {
            out.push(CanvasLine::new(a.x, -a.y, b.x, -b.y, color));
        }
    }
}

/// Terminal stand-in for opacity: full colour, then gray, then dark gray.
fn tier_color(base: Color, opacity: f64) -> Color {
    if opacity >= OPACITY_FULL {
        base
    } else if opacity > OPACITY_DIM_EDGE {
        Color::Gray
    } else {
        Color::DarkGray
    }
}

fn draw_info(frame: &mut Frame, tip: &Tooltip, area: Rect) {
    let mut lines = tip
        .rows
        .iter()
        .map(|(key, value)| {
            let value_style = if *key == "考点" {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!("{}: ", key), Style::default().fg(Color::DarkGray)),
                Span::styled(value.clone(), value_style),
            ])
        })
        .collect::<Vec<_>>();
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    let info = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                if tip.value("考点").is_some() {
                    format!("{} {}", tip.title, EXAM_MARKER)
                } else {
                    tip.title.clone()
                },
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .padding(Padding::new(1, 1, 0, 0)),
    );
    frame.render_widget(info, area);
}

fn draw_status(frame: &mut Frame, data: &CanvasRenderData<'_>, area: Rect) {
    let focused = data
        .view
        .edges
        .iter()
        .find(|e| e.emphasized)
        .and_then(|e| data.store.edge(e.stable_index));
    let top_status = match focused {
        Some(edge) => format!("FOCUSED: #{} {}", edge.stable_index, edge.label),
        None => "FOCUSED: —".to_string(),
    };
    let mut hint_line = data.hints.to_string();
    if let Some(msg) = data.message {
        hint_line.push_str("   ");
        hint_line.push_str(msg);
    }

    let status = Paragraph::new(vec![
        Line::from(Span::styled(
            top_status,
            Style::default()
                .fg(if focused.is_some() {
                    Color::LightRed
                } else {
                    Color::Cyan
                })
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            hint_line,
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::new(1, 1, 0, 0)),
    );
    frame.render_widget(status, area);
}

fn truncate_text(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return text.chars().take(max_width).collect();
    }
    let mut out = text
        .chars()
        .take(max_width.saturating_sub(3))
        .collect::<String>();
    out.push_str("...");
    out
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 84, 70);
    frame.render_widget(Clear, area);
    let help = Paragraph::new(vec![
        Line::from("REACTIONS (left): reactions grouped by pathway"),
        Line::from("  j/k move   Enter focus reaction / fold group   z fold all"),
        Line::from(""),
        Line::from("MAP (right): Tab switches panels"),
        Line::from("  n/N next/previous node   arrows or hjkl pan   Shift+arrows or HJKL drag"),
        Line::from("  + / - zoom   0 reset view   / search   Esc clear focus and search"),
        Line::from("  e exam point of the focused reaction"),
        Line::from(""),
        Line::from("TEACHING"),
        Line::from("  m switch research/teaching   Space/p play or pause   r reset"),
        Line::from("  x quiz: Enter on an enzyme node to name it"),
        Line::from(""),
        Line::from("s settings   b hide sidebar   q quit"),
    ])
    .block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, area);
}

pub(crate) fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
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
