//! Field rendering utilities for forms

use crate::state::{FieldDisplay, FieldKind, FieldSpec};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use formwizard::form::{DisplayState, FieldRenderer};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Bordered input (3 rows) plus the error line under it
pub const FIELD_HEIGHT: u16 = 4;

/// A button under the fields: (label, primary, enabled)
pub type ButtonSpec<'a> = (&'a str, bool, bool);

fn border_color(state: DisplayState, is_active: bool) -> Color {
    match state {
        DisplayState::Invalid => Color::Red,
        DisplayState::Valid => Color::Green,
        DisplayState::Pristine if is_active => Color::Cyan,
        DisplayState::Pristine => Color::DarkGray,
    }
}

fn title_line<'a>(spec: &'a FieldSpec, display: &FieldDisplay, is_active: bool) -> Line<'a> {
    let label_style = if is_active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut spans = vec![Span::raw(" "), Span::styled(spec.label, label_style)];
    if spec.required {
        spans.push(Span::styled("*", Style::default().fg(Color::Red)));
    }
    if spec.is_password() && display.revealed {
        spans.push(Span::styled(" (shown)", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::raw(" "));
    Line::from(spans)
}

fn value_line<'a>(spec: &'a FieldSpec, display: &'a FieldDisplay, is_active: bool) -> Line<'a> {
    let text_style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = Style::default().fg(Color::Cyan);

    let value = if display.text.is_empty() {
        Span::styled(
            spec.placeholder,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(display.text.as_str(), text_style)
    };

    match spec.kind {
        FieldKind::Text | FieldKind::Password if is_active && display.text.is_empty() => {
            Line::from(vec![Span::styled("▌", cursor), value])
        }
        FieldKind::Text | FieldKind::Password if is_active => {
            Line::from(vec![value, Span::styled("▌", cursor)])
        }
        FieldKind::Choice(_) | FieldKind::Date if is_active => Line::from(vec![
            Span::styled("‹ ", cursor),
            value,
            Span::styled(" ›", cursor),
        ]),
        _ => Line::from(value),
    }
}

/// Draw one field from its renderer's current output
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    spec: &FieldSpec,
    display: &FieldDisplay,
    is_active: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .title(title_line(spec, display, is_active))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(display.state, is_active)));
    frame.render_widget(
        Paragraph::new(value_line(spec, display, is_active)).block(block),
        chunks[0],
    );

    if let Some(error) = &display.error {
        let message = Paragraph::new(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )));
        frame.render_widget(message, chunks[1]);
    }
}

/// Draw `specs` top to bottom with a row of buttons below them
pub fn draw_fields(
    frame: &mut Frame,
    area: Rect,
    specs: &[FieldSpec],
    renderers: &mut [FieldRenderer<FieldDisplay>],
    focus: usize,
    buttons: &[ButtonSpec<'_>],
) {
    let constraints: Vec<Constraint> = specs
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .chain([Constraint::Length(BUTTON_HEIGHT), Constraint::Min(0)])
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (index, spec) in specs.iter().enumerate() {
        let Some(renderer) = renderers
            .iter_mut()
            .find(|renderer| renderer.path().as_str() == spec.path)
        else {
            tracing::warn!(path = spec.path, "no renderer bound for field");
            continue;
        };
        draw_field(frame, chunks[index], spec, renderer.render(), index == focus);
    }

    draw_buttons(frame, chunks[specs.len()], buttons);
}

fn draw_buttons(frame: &mut Frame, area: Rect, buttons: &[ButtonSpec<'_>]) {
    let constraints: Vec<Constraint> = buttons
        .iter()
        .map(|(label, _, _)| Constraint::Length(label.chars().count() as u16 + 6))
        .chain([Constraint::Min(0)])
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .spacing(1)
        .split(area);

    for (index, (label, is_primary, is_enabled)) in buttons.iter().enumerate() {
        render_button(frame, chunks[index], label, *is_primary, *is_enabled);
    }
}
