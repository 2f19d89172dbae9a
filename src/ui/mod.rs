//! UI module for rendering the forms

mod components;
mod forms;
mod layout;

use crate::app::App;
use crate::state::View;
use formwizard::form::{FormScope, SubmissionStatus};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let (header_area, main_area) = layout::create_layout(frame.area());
    layout::draw_header(frame, header_area, app.view);

    let notice = layout::Notice::for_app(app);
    let result = match app.view {
        View::Simple => {
            let page = &mut app.simple;
            FormScope::root().provide(&page.form, |scope| {
                forms::draw_simple(
                    frame,
                    main_area,
                    scope,
                    &mut page.renderers,
                    page.focus,
                    notice.as_ref(),
                )
            })
        }
        View::Wizard => {
            let page = &mut app.wizard;
            FormScope::root().provide(page.wizard.form(), |scope| {
                forms::draw_wizard(
                    frame,
                    main_area,
                    scope,
                    &page.wizard,
                    &mut page.renderers,
                    page.focus,
                    notice.as_ref(),
                )
            })
        }
    };

    if let Err(err) = result {
        tracing::error!(%err, "form could not be drawn");
        components::render_error_dialog(frame, &err.to_string());
    }

    layout::draw_status_bar(frame, app.view);
}

/// Draw while a submission is in flight. The form is held by the
/// submission, so the frame is built from its published status alone.
pub fn draw_submitting(frame: &mut Frame, view: View, status: &SubmissionStatus) {
    let (header_area, main_area) = layout::create_layout(frame.area());
    layout::draw_header(frame, header_area, view);

    let block = Block::default()
        .title(format!(" {} ", view.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(main_area);
    frame.render_widget(block, main_area);

    if let Some(notice) = layout::Notice::for_status(status) {
        let middle = Rect {
            y: inner.y + inner.height / 2,
            height: inner.height.min(1),
            ..inner
        };
        frame.render_widget(
            Paragraph::new(notice.line()).alignment(Alignment::Center),
            middle,
        );
    }

    layout::draw_status_bar(frame, view);
}
