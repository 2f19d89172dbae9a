//! Button component for TUI

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Render a bordered button; the primary button is highlighted and a
/// disabled one greyed out
pub fn render_button(
    frame: &mut Frame,
    area: Rect,
    content: &str,
    is_primary: bool,
    is_enabled: bool,
) {
    let (border_style, text_style) = match (is_enabled, is_primary) {
        (false, _) => (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        ),
        (true, true) => (
            Style::default().fg(Color::Cyan),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        (true, false) => (Style::default().fg(Color::Gray), Style::default()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .style(text_style)
        .block(block);

    frame.render_widget(paragraph, area);
}
