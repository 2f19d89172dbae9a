//! Centered error overlay

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const MAX_WIDTH: u16 = 60;

/// Render an error message in a red box over the middle of the screen
pub fn render_error_dialog(frame: &mut Frame, message: &str) {
    let area = frame.area();
    let width = (message.chars().count() as u16 + 6).clamp(24, MAX_WIDTH).min(area.width);
    let inner_width = width.saturating_sub(4).max(1);
    let message_lines = (message.chars().count() as u16).div_ceil(inner_width).max(1);
    let height = (message_lines + 4).min(area.height);

    let dialog_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let content = vec![
        Line::from(Span::styled(
            "Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message),
    ];

    let dialog = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(Clear, dialog_area);
    frame.render_widget(dialog, dialog_area);
}
