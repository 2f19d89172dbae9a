//! Application state and key handling

use crate::backend::RegistrationBackend;
use crate::config::FormsConfig;
use crate::platform::is_shortcut;
use crate::state::{Banner, FormPage, SimplePage, View, WizardPage, SUCCESS_MESSAGE};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use formwizard::form::{FormError, SubmissionStatus};
use tokio::sync::watch;

/// Main application struct
pub struct App {
    /// Form on screen
    pub view: View,
    pub simple: SimplePage,
    pub wizard: WizardPage,
    simple_backend: RegistrationBackend,
    wizard_backend: RegistrationBackend,
    /// Set by Enter on a submit; the loop picks it up after drawing
    pending_submit: bool,
    quit: bool,
}

impl App {
    pub fn new(config: &FormsConfig) -> Result<Self> {
        let mode = config.validation_mode();
        Ok(Self {
            view: config.start_view(),
            simple: SimplePage::new(mode)?,
            wizard: WizardPage::new(mode, Local::now().date_naive())?,
            simple_backend: RegistrationBackend::from_config(config, View::Simple),
            wizard_backend: RegistrationBackend::from_config(config, View::Wizard),
            pending_submit: false,
            quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Submission status of the form on screen
    pub fn submission_status(&self) -> SubmissionStatus {
        match self.view {
            View::Simple => self.simple.form.status(),
            View::Wizard => self.wizard.wizard.form().status(),
        }
    }

    /// Follow the status of the form on screen while it submits
    pub fn subscribe_status(&self) -> watch::Receiver<SubmissionStatus> {
        match self.view {
            View::Simple => self.simple.form.subscribe_status(),
            View::Wizard => self.wizard.wizard.form().subscribe_status(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submission_status() == SubmissionStatus::Submitting
    }

    /// Hand the queued submission to the caller, at most once
    pub fn take_pending_submit(&mut self) -> bool {
        std::mem::take(&mut self.pending_submit)
    }

    /// Banner of the form on screen
    pub fn banner(&self) -> Option<&Banner> {
        match self.view {
            View::Simple => self.simple.banner.as_ref(),
            View::Wizard => self.wizard.banner.as_ref(),
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if is_shortcut(&key, 'c') {
            self.quit = true;
            return Ok(());
        }

        // Input waits until the queued submission has run
        if self.pending_submit {
            return Ok(());
        }

        if is_shortcut(&key, 't') {
            self.view = self.view.toggled();
            tracing::debug!(view = ?self.view, "switched form");
            return Ok(());
        }

        match self.view {
            View::Simple => self.handle_simple_key(key),
            View::Wizard => self.handle_wizard_key(key),
        }
    }

    fn handle_simple_key(&mut self, key: KeyEvent) -> Result<()> {
        if is_shortcut(&key, 'r') {
            self.simple.reset();
            self.simple.banner = None;
            return Ok(());
        }

        match key.code {
            KeyCode::Enter => self.pending_submit = true,
            _ => {
                handle_page_key(&mut self.simple, &key)?;
            }
        }
        Ok(())
    }

    fn handle_wizard_key(&mut self, key: KeyEvent) -> Result<()> {
        if is_shortcut(&key, 'r') {
            self.wizard.reset();
            self.wizard.banner = None;
            return Ok(());
        }

        match key.code {
            KeyCode::Enter if self.wizard.wizard.is_last_step() => self.pending_submit = true,
            KeyCode::Enter => {
                self.wizard.next_step();
            }
            KeyCode::Esc => {
                self.wizard.back_step();
            }
            _ => {
                handle_page_key(&mut self.wizard, &key)?;
            }
        }
        Ok(())
    }

    /// Submit the form on screen and turn the outcome into a banner.
    /// A successful submission resets the form.
    pub async fn submit_current(&mut self) -> Result<()> {
        match self.view {
            View::Simple => {
                let page = &mut self.simple;
                page.banner = None;
                let outcome = page.form.submit(&self.simple_backend).await;
                let succeeded = outcome.is_ok();
                page.banner = outcome_banner(outcome)?;
                if succeeded {
                    page.reset();
                } else {
                    page.focus_first_invalid();
                }
            }
            View::Wizard => {
                let page = &mut self.wizard;
                page.banner = None;
                let outcome = page.wizard.submit_final(&self.wizard_backend).await;
                let succeeded = outcome.is_ok();
                page.banner = outcome_banner(outcome)?;
                if succeeded {
                    page.reset();
                } else {
                    page.focus_first_invalid();
                }
            }
        }
        Ok(())
    }
}

/// Focus movement, password reveal and field editing common to both forms
fn handle_page_key<P: FormPage>(page: &mut P, key: &KeyEvent) -> Result<bool> {
    if is_shortcut(key, 'v') {
        return Ok(page.toggle_active_password());
    }
    match key.code {
        KeyCode::Tab => page.next_field()?,
        KeyCode::BackTab => page.prev_field()?,
        _ => return Ok(page.input_key(key)?),
    }
    Ok(true)
}

fn outcome_banner(outcome: Result<(), FormError>) -> Result<Option<Banner>, FormError> {
    match outcome {
        Ok(()) => {
            tracing::info!("form submitted");
            Ok(Some(Banner::Success(SUCCESS_MESSAGE.to_string())))
        }
        Err(FormError::Submission(message)) => Ok(Some(Banner::Error(message))),
        Err(FormError::Validation(errors)) => {
            tracing::debug!(%errors, "submission blocked by validation");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use formwizard::form::DisplayState;
    use formwizard::registration::simple_defaults;
    use pretty_assertions::assert_eq;

    fn config() -> FormsConfig {
        FormsConfig {
            submit_delay_ms: Some(0),
            ..Default::default()
        }
    }

    fn app() -> App {
        App::new(&config()).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    fn ctrl(app: &mut App, letter: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(letter), KeyModifiers::CONTROL))
            .unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_simple(app: &mut App) {
        type_text(app, "Ada Lovelace");
        press(app, KeyCode::Tab);
        type_text(app, "ada@example.com");
        press(app, KeyCode::Tab);
        type_text(app, "Abcdefg1");
    }

    fn submit(app: &mut App) {
        press(app, KeyCode::Enter);
        assert!(app.take_pending_submit());
        tokio_test::block_on(app.submit_current()).unwrap();
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_starts_on_configured_view() {
            let app = App::new(&FormsConfig {
                start_view: Some(View::Wizard),
                ..config()
            })
            .unwrap();
            assert_eq!(app.view, View::Wizard);
        }

        #[test]
        fn test_ctrl_t_switches_forms_keeping_values() {
            let mut app = app();
            type_text(&mut app, "Ada");
            ctrl(&mut app, 't');
            assert_eq!(app.view, View::Wizard);
            type_text(&mut app, "Jo");
            ctrl(&mut app, 't');
            assert_eq!(app.view, View::Simple);
            assert_eq!(app.simple.form.values().text("name"), "Ada");
            assert_eq!(app.wizard.wizard.form().values().text("firstName"), "Jo");
        }

        #[test]
        fn test_ctrl_c_quits() {
            let mut app = app();
            ctrl(&mut app, 'c');
            assert!(app.should_quit());
        }

        #[test]
        fn test_wizard_enter_and_escape() {
            let mut app = app();
            ctrl(&mut app, 't');
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.wizard.wizard.current_step_index(), 0);
            assert!(!app.take_pending_submit());

            type_text(&mut app, "Jo");
            press(&mut app, KeyCode::Tab);
            type_text(&mut app, "Doe");
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.wizard.wizard.current_step_index(), 1);

            press(&mut app, KeyCode::Esc);
            assert_eq!(app.wizard.wizard.current_step_index(), 0);
        }

        #[test]
        fn test_keys_wait_for_pending_submit() {
            let mut app = app();
            press(&mut app, KeyCode::Enter);
            type_text(&mut app, "x");
            assert_eq!(app.simple.form.values().text("name"), "");
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_invalid_submit_shows_errors_without_banner() {
            let mut app = app();
            type_text(&mut app, "Ada");
            submit(&mut app);

            assert_eq!(app.banner(), None);
            assert_eq!(app.simple.focus, 1);
            assert_eq!(app.simple.renderers[0].render().state, DisplayState::Valid);
            let email = app.simple.renderers[1].render();
            assert_eq!(email.state, DisplayState::Invalid);
            assert_eq!(
                email.error.as_deref(),
                Some("Please enter a valid email address")
            );
            assert!(!app.is_submitting());
        }

        #[test]
        fn test_successful_submit_resets_and_shows_banner() {
            let mut app = app();
            fill_simple(&mut app);
            submit(&mut app);

            assert_eq!(
                app.banner(),
                Some(&Banner::Success("Form submitted successfully!".to_string()))
            );
            assert_eq!(app.simple.form.values(), simple_defaults());
            assert_eq!(app.simple.focus, 0);
            assert_eq!(app.simple.renderers[0].render().state, DisplayState::Pristine);
        }

        #[test]
        fn test_failed_submit_keeps_values() {
            let mut app = App::new(&FormsConfig {
                simulate_failure: Some("Server unavailable".to_string()),
                ..config()
            })
            .unwrap();
            fill_simple(&mut app);
            submit(&mut app);

            assert_eq!(
                app.banner(),
                Some(&Banner::Error("Server unavailable".to_string()))
            );
            assert_eq!(app.simple.form.values().text("name"), "Ada Lovelace");
            assert_eq!(
                app.simple.form.submission_error().as_deref(),
                Some("Server unavailable")
            );
        }

        #[test]
        fn test_status_follows_backend_in_flight() {
            let mut app = App::new(&FormsConfig {
                submit_delay_ms: Some(60_000),
                ..Default::default()
            })
            .unwrap();
            fill_simple(&mut app);
            press(&mut app, KeyCode::Enter);
            assert!(app.take_pending_submit());
            assert!(!app.is_submitting());

            let status = app.subscribe_status();
            tokio_test::block_on(async {
                let mut submission = tokio_test::task::spawn(app.submit_current());
                assert!(submission.poll().is_pending());
                assert_eq!(*status.borrow(), SubmissionStatus::Submitting);
            });
            assert_eq!(*status.borrow(), SubmissionStatus::Idle);
            assert!(!app.is_submitting());
            assert_eq!(app.simple.form.values().text("name"), "Ada Lovelace");
        }

        #[test]
        fn test_ctrl_r_clears_banner_and_values() {
            let mut app = app();
            fill_simple(&mut app);
            submit(&mut app);
            type_text(&mut app, "Grace");
            ctrl(&mut app, 'r');
            assert_eq!(app.banner(), None);
            assert_eq!(app.simple.form.values(), simple_defaults());
        }

        #[test]
        fn test_wizard_completes_and_returns_to_first_step() {
            let mut app = app();
            ctrl(&mut app, 't');

            type_text(&mut app, "Jo");
            press(&mut app, KeyCode::Tab);
            type_text(&mut app, "Doe");
            press(&mut app, KeyCode::Enter);

            for (index, text) in ["jo@example.com", "+15551234567", "1 Main Street", "Springfield"]
                .into_iter()
                .enumerate()
            {
                app.wizard.focus = index;
                type_text(&mut app, text);
            }
            app.wizard.focus = 4;
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::Enter);
            assert!(app.wizard.wizard.is_last_step());

            type_text(&mut app, "jodoe");
            press(&mut app, KeyCode::Tab);
            type_text(&mut app, "Abcdefg1");
            press(&mut app, KeyCode::Tab);
            type_text(&mut app, "Abcdefg1");
            submit(&mut app);

            assert_eq!(
                app.banner(),
                Some(&Banner::Success("Form submitted successfully!".to_string()))
            );
            assert_eq!(app.wizard.wizard.current_step_index(), 0);
            assert_eq!(app.wizard.wizard.form().values().text("firstName"), "");
        }

        #[test]
        fn test_wizard_mismatched_passwords_block_submit() {
            let mut app = app();
            ctrl(&mut app, 't');
            app.wizard.wizard.form_mut().reset(Some(
                formwizard::form::FormValues::new()
                    .with("firstName", "Jo")
                    .with("lastName", "Doe")
                    .with("email", "jo@example.com")
                    .with("phone", "+15551234567")
                    .with("address", "1 Main Street")
                    .with("city", "Springfield")
                    .with("country", "us")
                    .with("username", "jodoe")
                    .with("password", "Abcdefg1"),
            ));
            press(&mut app, KeyCode::Enter);
            press(&mut app, KeyCode::Enter);
            app.wizard.focus = 2;
            type_text(&mut app, "Abcdefg2");
            submit(&mut app);

            assert_eq!(app.banner(), None);
            assert_eq!(app.wizard.wizard.current_step_index(), 2);
            assert_eq!(app.wizard.focus, 2);
            assert_eq!(
                app.wizard.renderers[11].render().error.as_deref(),
                Some("Passwords don't match")
            );
        }
    }
}
