pub mod components;
pub mod view;

use std::sync::OnceLock;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};

use crate::app::App;
use crate::theme::Theme;
use view::{BorderKind, Callback, Node};

// Set once at startup from config; tests and --render fall back to defaults
static THEME: OnceLock<Theme> = OnceLock::new();

pub fn init_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("Theme already initialized");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn warning() -> Color { theme().warning }
fn bg_selected() -> Color { theme().bg_selected }
pub(crate) fn ancestor_border() -> Color { theme().ancestor }
pub(crate) fn great_grand_child_border() -> Color { theme().border }

/// Where a button landed on screen and what it does
#[derive(Debug, Clone)]
pub struct ButtonHit {
    pub area: Rect,
    pub on_activate: Callback,
}

/// Draw the whole screen; returns the buttons that made it onto it
pub fn draw(f: &mut Frame, app: &App) -> Vec<ButtonHit> {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Info line
        Constraint::Min(0),    // Family tree
        Constraint::Length(1), // Footer
    ])
    .split(f.area());

    draw_info_line(f, app, chunks[0]);

    let mut hits = Vec::new();
    let tree = app.view();
    render_node(&tree, chunks[1], f.buffer_mut(), Some(app.focused_button), &mut hits);

    draw_footer(f, chunks[2]);
    hits
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.status_message {
        Some(ref msg) => Line::from(Span::styled(format!(" {}", msg), Style::default().fg(warning()))),
        None => Line::from(vec![
            Span::styled(" Count held by the parent: ", Style::default().fg(text_dim())),
            Span::styled(app.count.to_string(), Style::default().fg(accent()).add_modifier(Modifier::BOLD)),
        ]),
    };

    f.render_widget(Paragraph::new(line), area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let hints = [("Enter", "Increment"), ("Tab", "Focus"), ("Click", "Increment"), ("q", "Quit")];

    let hint_spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

/// Render a view tree top to bottom into `area`.
///
/// `focused` is the index, in document order, of the button drawn as focused.
/// Every button that gets at least one visible cell is pushed onto `hits`.
pub fn render_node(
    node: &Node,
    area: Rect,
    buf: &mut Buffer,
    focused: Option<usize>,
    hits: &mut Vec<ButtonHit>,
) {
    if area.is_empty() {
        return;
    }

    match node {
        Node::Text(content) => {
            Paragraph::new(Span::styled(content.as_str(), Style::default().fg(text()))).render(area, buf);
        }
        Node::Button { label, on_activate } => {
            let is_focused = focused == Some(hits.len());
            let style = if is_focused {
                Style::default().fg(accent()).bg(bg_selected()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(text())
            };

            let caption = format!("[ {} ]", label);
            let width = (caption.chars().count() as u16).min(area.width);
            let button_area = Rect { width, height: 1, ..area };

            Paragraph::new(Span::styled(caption, style)).render(button_area, buf);
            hits.push(ButtonHit { area: button_area, on_activate: on_activate.clone() });
        }
        Node::Container { border, margin, children } => {
            let area = area.inner(Margin::new(*margin, *margin));
            let inner = match border {
                Some(border) => {
                    let block = Block::default()
                        .borders(Borders::ALL)
                        .border_type(match border.kind {
                            BorderKind::Plain => BorderType::Plain,
                            BorderKind::Thick => BorderType::Thick,
                        })
                        .border_style(Style::default().fg(border.color));
                    let inner = block.inner(area);
                    block.render(area, buf);
                    inner
                }
                None => area,
            };

            let constraints = children
                .iter()
                .map(|c| Constraint::Length(c.height()))
                .chain(std::iter::once(Constraint::Min(0)));
            let rows = Layout::vertical(constraints).split(inner);

            for (child, row) in children.iter().zip(rows.iter()) {
                render_node(child, *row, buf, focused, hits);
            }
        }
    }
}

/// Plain-text snapshot of a tree at the given width, one string per row
pub fn render_text(node: &Node, width: u16) -> Vec<String> {
    let area = Rect::new(0, 0, width, node.height());
    let mut buf = Buffer::empty(area);
    render_node(node, area, &mut buf, None, &mut Vec::new());
    buffer_lines(&buf)
}

pub(crate) fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let width = buf.area.width.max(1) as usize;
    buf.content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>().trim_end().to_string())
        .collect()
}
