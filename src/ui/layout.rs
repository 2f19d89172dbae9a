//! Layout components (header, notices, status bar)

use crate::app::App;
use crate::platform::{QUIT_SHORTCUT, RESET_SHORTCUT, REVEAL_SHORTCUT, SWITCH_VIEW_SHORTCUT};
use crate::state::{Banner, View, SUCCESS_MESSAGE};
use formwizard::form::SubmissionStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const VIEWS: [View; 2] = [View::Simple, View::Wizard];

/// Split the screen into header and content, reserving the bottom line for
/// the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the header with one tab per form
pub fn draw_header(frame: &mut Frame, area: Rect, current: View) {
    let mut spans = vec![Span::styled(
        " formwizard ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    for view in VIEWS {
        spans.push(Span::raw("  "));
        let style = if view == current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(view.title(), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// One-line message above a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Submitting,
    Success(String),
    Error(String),
}

impl Notice {
    /// The form's own submission status first, then the page banner
    pub fn for_app(app: &App) -> Option<Self> {
        if app.is_submitting() {
            return Some(Notice::Submitting);
        }
        app.banner().map(|banner| match banner {
            Banner::Success(message) => Notice::Success(message.clone()),
            Banner::Error(message) => Notice::Error(message.clone()),
        })
    }

    pub fn for_status(status: &SubmissionStatus) -> Option<Self> {
        match status {
            SubmissionStatus::Idle => None,
            SubmissionStatus::Submitting => Some(Notice::Submitting),
            SubmissionStatus::Succeeded => Some(Notice::Success(SUCCESS_MESSAGE.to_string())),
            SubmissionStatus::Failed(message) => Some(Notice::Error(message.clone())),
        }
    }

    pub fn line(&self) -> Line<'_> {
        match self {
            Notice::Submitting => Line::from(Span::styled(
                "Submitting...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            Notice::Success(message) => Line::from(vec![
                Span::styled("✓ ", Style::default().fg(Color::Green)),
                Span::styled(message.as_str(), Style::default().fg(Color::Green)),
            ]),
            Notice::Error(message) => Line::from(vec![
                Span::styled("✗ ", Style::default().fg(Color::Red)),
                Span::styled(message.as_str(), Style::default().fg(Color::Red)),
            ]),
        }
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, view: View) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let hints = view_hints(view);
    let status = Paragraph::new(Line::from(Span::styled(
        format!(" {hints}"),
        Style::default().fg(Color::Gray),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_hint = format!(" {QUIT_SHORTCUT}:quit ");
    let quit_width = quit_hint.len() as u16;
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_width),
        y: status_area.y,
        width: quit_width.min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the current view
fn view_hints(view: View) -> String {
    match view {
        View::Simple => format!(
            "Tab:next  Enter:submit  {REVEAL_SHORTCUT}:show password  {RESET_SHORTCUT}:reset  {SWITCH_VIEW_SHORTCUT}:wizard"
        ),
        View::Wizard => format!(
            "Tab:next  ←/→:change  Enter:next/submit  Esc:back  {RESET_SHORTCUT}:reset  {SWITCH_VIEW_SHORTCUT}:simple form"
        ),
    }
}
