//! Single-page registration form

use super::field_renderer::draw_fields;
use crate::state::{FieldDisplay, SIMPLE_FIELDS};
use crate::ui::layout::Notice;
use formwizard::form::{ContextMissingError, FieldRenderer, FormScope};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the form provided by `scope`
pub fn draw_simple(
    frame: &mut Frame,
    area: Rect,
    scope: &FormScope<'_>,
    renderers: &mut [FieldRenderer<FieldDisplay>],
    focus: usize,
    notice: Option<&Notice>,
) -> Result<(), ContextMissingError> {
    let form = scope.consume()?;

    let title = if form.is_dirty() {
        " Registration Form ● "
    } else {
        " Registration Form "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Description
            Constraint::Length(1), // Notice
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Fields and buttons
        ])
        .horizontal_margin(1)
        .split(inner);

    frame.render_widget(
        Paragraph::new("Fill out the required information below")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[0],
    );
    if let Some(notice) = notice {
        frame.render_widget(Paragraph::new(notice.line()), chunks[1]);
    }

    let submitting = notice == Some(&Notice::Submitting);
    let submit_label = if submitting { "Submitting..." } else { "Submit" };
    draw_fields(
        frame,
        chunks[3],
        SIMPLE_FIELDS,
        renderers,
        focus,
        &[(submit_label, true, !submitting), ("Reset", false, !submitting)],
    );

    if form.submit_count() > 0 && !submitting && notice.is_none() {
        let hint = Line::from("Fix the highlighted fields and press Enter again")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(Paragraph::new(hint), chunks[2]);
    }
    Ok(())
}
