//! Multi-step registration wizard

use super::field_renderer::draw_fields;
use crate::state::{FieldDisplay, WIZARD_STEP_FIELDS};
use crate::ui::layout::Notice;
use formwizard::form::{ContextMissingError, FieldRenderer, FormScope, WizardController};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Step titles joined into a trail: done steps ticked, the current one
/// highlighted
fn step_trail(wizard: &WizardController) -> Line<'_> {
    let current = wizard.current_step_index();
    let mut spans = Vec::new();
    for (index, step) in wizard.steps().iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" ─ ", Style::default().fg(Color::DarkGray)));
        }
        let span = match index.cmp(&current) {
            std::cmp::Ordering::Less => Span::styled(
                format!("✓ {}", step.title),
                Style::default().fg(Color::Green),
            ),
            std::cmp::Ordering::Equal => Span::styled(
                format!("● {}", step.title),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            std::cmp::Ordering::Greater => Span::styled(
                format!("○ {}", step.title),
                Style::default().fg(Color::DarkGray),
            ),
        };
        spans.push(span);
    }
    Line::from(spans)
}

/// Draw the current step of `wizard`, whose form `scope` provides
pub fn draw_wizard(
    frame: &mut Frame,
    area: Rect,
    scope: &FormScope<'_>,
    wizard: &WizardController,
    renderers: &mut [FieldRenderer<FieldDisplay>],
    focus: usize,
    notice: Option<&Notice>,
) -> Result<(), ContextMissingError> {
    let form = scope.consume()?;

    let title = if form.is_dirty() {
        " Multi-Step Registration ● "
    } else {
        " Multi-Step Registration "
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
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Step trail
            Constraint::Length(1), // Notice
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Fields and buttons
        ])
        .horizontal_margin(1)
        .split(inner);

    let (step, total) = wizard.progress();
    let progress = Line::from(vec![
        Span::styled(
            format!("Step {step} of {total}"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(": {}", wizard.current_step().title),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(Paragraph::new(progress), chunks[0]);
    frame.render_widget(Paragraph::new(step_trail(wizard)), chunks[1]);
    if let Some(notice) = notice {
        frame.render_widget(Paragraph::new(notice.line()), chunks[2]);
    }

    let submitting = notice == Some(&Notice::Submitting);
    let primary = match (wizard.is_last_step(), submitting) {
        (true, true) => "Submitting...",
        (true, false) => "Submit",
        (false, _) => "Next",
    };
    let specs = WIZARD_STEP_FIELDS
        .get(wizard.current_step_index())
        .copied()
        .unwrap_or(&[]);
    draw_fields(
        frame,
        chunks[4],
        specs,
        renderers,
        focus,
        &[
            ("Back", false, !wizard.is_first_step() && !submitting),
            (primary, true, !submitting),
        ],
    );
    Ok(())
}
