//! The two form pages and the keyboard editing they share

use super::fields::{
    cycle_choice, display_fn, Choices, FieldDisplay, FieldKind, FieldSpec, SIMPLE_FIELDS,
    WIZARD_STEP_FIELDS,
};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formwizard::form::{
    FieldRenderer, FieldValue, FormController, FormError, FormScope, ValidationMode,
    WizardController,
};
use formwizard::registration;

pub type Renderers = Vec<FieldRenderer<FieldDisplay>>;

pub const SUCCESS_MESSAGE: &str = "Form submitted successfully!";

/// Outcome message shown above a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

fn bind_renderers<'a>(
    form: &FormController,
    specs: impl IntoIterator<Item = &'a FieldSpec>,
) -> Result<Renderers, FormError> {
    FormScope::root().provide(form, |scope| {
        specs
            .into_iter()
            .map(|spec| FieldRenderer::bind(scope, spec.path, display_fn(*spec)))
            .collect()
    })
}

/// A value edit triggered by a key
#[derive(Debug, Clone, Copy, PartialEq)]
enum Edit {
    Push(char),
    Pop,
    Cycle(Choices, isize),
    Days(i64),
    Years(i32),
}

impl Edit {
    fn from_key(kind: FieldKind, key: &KeyEvent) -> Option<Self> {
        let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
        match (kind, key.code) {
            (FieldKind::Text | FieldKind::Password, KeyCode::Char(c)) if plain => {
                Some(Edit::Push(c))
            }
            (FieldKind::Text | FieldKind::Password, KeyCode::Backspace) => Some(Edit::Pop),
            (FieldKind::Choice(choices), KeyCode::Right | KeyCode::Char(' ')) => {
                Some(Edit::Cycle(choices, 1))
            }
            (FieldKind::Choice(choices), KeyCode::Left) => Some(Edit::Cycle(choices, -1)),
            (FieldKind::Date, KeyCode::Right) => Some(Edit::Days(1)),
            (FieldKind::Date, KeyCode::Left) => Some(Edit::Days(-1)),
            (FieldKind::Date, KeyCode::Up) => Some(Edit::Years(1)),
            (FieldKind::Date, KeyCode::Down) => Some(Edit::Years(-1)),
            _ => None,
        }
    }

    fn apply(self, value: &mut FieldValue) {
        match self {
            Edit::Push(c) => value.push_char(c),
            Edit::Pop => value.pop_char(),
            Edit::Cycle(choices, step) => cycle_choice(choices, value, step),
            Edit::Days(days) => value.shift_days(days),
            Edit::Years(years) => value.shift_years(years),
        }
    }
}

/// Focus and editing over the fields a page currently shows
pub trait FormPage {
    /// Fields on screen, in focus order
    fn fields(&self) -> &'static [FieldSpec];
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn form(&self) -> &FormController;
    fn parts_mut(&mut self) -> (&mut FormController, &mut [FieldRenderer<FieldDisplay>]);

    fn active_spec(&self) -> Option<FieldSpec> {
        self.fields().get(self.active_field()).copied()
    }

    /// Blur the focused field and move focus forward, wrapping
    fn next_field(&mut self) -> Result<(), FormError> {
        let count = self.fields().len();
        if count == 0 {
            return Ok(());
        }
        self.blur_active()?;
        self.set_active_field((self.active_field() + 1) % count);
        Ok(())
    }

    /// Blur the focused field and move focus back, wrapping
    fn prev_field(&mut self) -> Result<(), FormError> {
        let count = self.fields().len();
        if count == 0 {
            return Ok(());
        }
        self.blur_active()?;
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
        Ok(())
    }

    /// Run `f` against the focused field's renderer; `None` without focus
    fn with_active<T>(
        &mut self,
        f: impl FnOnce(&mut FormController, &mut FieldRenderer<FieldDisplay>, FieldSpec) -> T,
    ) -> Option<T> {
        let spec = self.active_spec()?;
        let (form, renderers) = self.parts_mut();
        let renderer = renderers
            .iter_mut()
            .find(|renderer| renderer.path().as_str() == spec.path)?;
        Some(f(form, renderer, spec))
    }

    fn blur_active(&mut self) -> Result<(), FormError> {
        self.with_active(|form, renderer, _| renderer.blur(form))
            .unwrap_or(Ok(()))
    }

    /// Flip password reveal on the focused field; false if it is no password
    fn toggle_active_password(&mut self) -> bool {
        self.with_active(|_, renderer, spec| {
            if spec.is_password() {
                renderer.toggle_password_visibility();
            }
            spec.is_password()
        })
        .unwrap_or(false)
    }

    /// Move focus to the first shown field carrying an error, if any
    fn focus_first_invalid(&mut self) {
        let form = self.form();
        let invalid = self.fields().iter().position(|spec| {
            form.field_state(spec.path)
                .is_some_and(|state| state.error.is_some())
        });
        if let Some(index) = invalid {
            self.set_active_field(index);
        }
    }

    /// Apply an editing key to the focused field.
    /// Returns false when the key means nothing to that field.
    fn input_key(&mut self, key: &KeyEvent) -> Result<bool, FormError> {
        let Some(edit) = self
            .active_spec()
            .and_then(|spec| Edit::from_key(spec.kind, key))
        else {
            return Ok(false);
        };
        self.with_active(|form, renderer, _| renderer.edit(form, |value| edit.apply(value)))
            .unwrap_or(Ok(()))?;
        Ok(true)
    }
}

/// Single-page registration form
#[derive(Debug)]
pub struct SimplePage {
    pub form: FormController,
    pub renderers: Renderers,
    pub focus: usize,
    pub banner: Option<Banner>,
}

impl SimplePage {
    pub fn new(mode: ValidationMode) -> Result<Self, FormError> {
        let form = registration::simple_form(mode);
        let renderers = bind_renderers(&form, SIMPLE_FIELDS)?;
        Ok(Self {
            form,
            renderers,
            focus: 0,
            banner: None,
        })
    }

    pub fn reset(&mut self) {
        self.form.reset(None);
        self.focus = 0;
    }
}

impl FormPage for SimplePage {
    fn fields(&self) -> &'static [FieldSpec] {
        SIMPLE_FIELDS
    }

    fn active_field(&self) -> usize {
        self.focus
    }

    fn set_active_field(&mut self, index: usize) {
        self.focus = index;
    }

    fn form(&self) -> &FormController {
        &self.form
    }

    fn parts_mut(&mut self) -> (&mut FormController, &mut [FieldRenderer<FieldDisplay>]) {
        (&mut self.form, &mut self.renderers)
    }
}

/// Three-step registration wizard
#[derive(Debug)]
pub struct WizardPage {
    pub wizard: WizardController,
    pub renderers: Renderers,
    pub focus: usize,
    pub banner: Option<Banner>,
}

impl WizardPage {
    pub fn new(mode: ValidationMode, today: NaiveDate) -> Result<Self, FormError> {
        let wizard = registration::registration_wizard(mode, today)?;
        let renderers = bind_renderers(wizard.form(), WIZARD_STEP_FIELDS.into_iter().flatten())?;
        Ok(Self {
            wizard,
            renderers,
            focus: 0,
            banner: None,
        })
    }

    /// Advance when the current step validates; otherwise focus its first
    /// invalid field
    pub fn next_step(&mut self) -> bool {
        let moved = self.wizard.next();
        if moved {
            self.focus = 0;
        } else {
            self.focus_first_invalid();
        }
        moved
    }

    pub fn back_step(&mut self) -> bool {
        let moved = self.wizard.back();
        if moved {
            self.focus = 0;
        }
        moved
    }

    pub fn reset(&mut self) {
        self.wizard.reset_wizard();
        self.focus = 0;
    }
}

impl FormPage for WizardPage {
    fn fields(&self) -> &'static [FieldSpec] {
        WIZARD_STEP_FIELDS
            .get(self.wizard.current_step_index())
            .copied()
            .unwrap_or(&[])
    }

    fn active_field(&self) -> usize {
        self.focus
    }

    fn set_active_field(&mut self, index: usize) {
        self.focus = index;
    }

    fn form(&self) -> &FormController {
        self.wizard.form()
    }

    fn parts_mut(&mut self) -> (&mut FormController, &mut [FieldRenderer<FieldDisplay>]) {
        (self.wizard.form_mut(), &mut self.renderers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwizard::form::DisplayState;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<P: FormPage>(page: &mut P, text: &str) {
        for c in text.chars() {
            assert!(page.input_key(&key(KeyCode::Char(c))).unwrap());
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    mod simple {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_typing_edits_focused_field() {
            let mut page = SimplePage::new(ValidationMode::OnBlur).unwrap();
            type_text(&mut page, "Ada");
            assert!(page.input_key(&key(KeyCode::Backspace)).unwrap());
            assert_eq!(page.form.values().text("name"), "Ad");
            assert_eq!(page.form.values().text("email"), "");
        }

        #[test]
        fn test_leaving_field_shows_its_error() {
            let mut page = SimplePage::new(ValidationMode::OnBlur).unwrap();
            type_text(&mut page, "A");
            assert_eq!(page.renderers[0].render().state, DisplayState::Pristine);

            page.next_field().unwrap();
            assert_eq!(page.focus, 1);
            let name = page.renderers[0].render();
            assert_eq!(name.state, DisplayState::Invalid);
            assert_eq!(
                name.error.as_deref(),
                Some("Name must be at least 2 characters")
            );
            // The field focus moved to was not validated
            assert_eq!(page.renderers[1].render().state, DisplayState::Pristine);
        }

        #[test]
        fn test_focus_wraps_both_ways() {
            let mut page = SimplePage::new(ValidationMode::OnBlur).unwrap();
            page.prev_field().unwrap();
            assert_eq!(page.focus, 2);
            page.next_field().unwrap();
            assert_eq!(page.focus, 0);
        }

        #[test]
        fn test_password_reveal_only_on_password_field() {
            let mut page = SimplePage::new(ValidationMode::OnBlur).unwrap();
            assert!(!page.toggle_active_password());

            page.set_active_field(2);
            type_text(&mut page, "Abc1");
            assert_eq!(page.renderers[2].render().text, "••••");
            assert!(page.toggle_active_password());
            assert_eq!(page.renderers[2].render().text, "Abc1");
        }

        #[test]
        fn test_control_chars_are_not_typed() {
            let mut page = SimplePage::new(ValidationMode::OnBlur).unwrap();
            let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
            assert!(!page.input_key(&ctrl_x).unwrap());
            assert_eq!(page.form.values().text("name"), "");
        }
    }

    mod wizard {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_renderers_cover_every_step() {
            let page = WizardPage::new(ValidationMode::OnBlur, today()).unwrap();
            assert_eq!(page.renderers.len(), 12);
            assert_eq!(page.fields()[0].path, "firstName");
        }

        #[test]
        fn test_date_and_choice_keys() {
            let mut page = WizardPage::new(ValidationMode::OnBlur, today()).unwrap();
            page.set_active_field(2);
            page.input_key(&key(KeyCode::Right)).unwrap();
            page.input_key(&key(KeyCode::Down)).unwrap();
            assert_eq!(
                page.form().values().date("dateOfBirth"),
                NaiveDate::from_ymd_opt(2023, 3, 16)
            );

            page.set_active_field(3);
            page.input_key(&key(KeyCode::Right)).unwrap();
            assert_eq!(page.form().values().text("gender"), "female");
            assert_eq!(page.renderers[3].render().text, "Female");
        }

        #[test]
        fn test_failed_next_focuses_first_invalid_field() {
            let mut page = WizardPage::new(ValidationMode::OnBlur, today()).unwrap();
            type_text(&mut page, "Jo");
            assert!(!page.next_step());
            assert_eq!(page.wizard.current_step_index(), 0);
            assert_eq!(page.focus, 1);
        }

        #[test]
        fn test_step_change_resets_focus() {
            let mut page = WizardPage::new(ValidationMode::OnBlur, today()).unwrap();
            type_text(&mut page, "Jo");
            page.next_field().unwrap();
            type_text(&mut page, "Doe");
            assert!(page.next_step());
            assert_eq!(page.focus, 0);
            assert_eq!(page.fields()[0].path, "email");

            page.set_active_field(3);
            assert!(page.back_step());
            assert_eq!(page.focus, 0);
            assert_eq!(page.form().values().text("lastName"), "Doe");
        }

        #[test]
        fn test_reset_returns_to_first_step() {
            let mut page = WizardPage::new(ValidationMode::OnBlur, today()).unwrap();
            type_text(&mut page, "Jo");
            page.next_field().unwrap();
            type_text(&mut page, "Doe");
            assert!(page.next_step());
            page.reset();
            assert_eq!(page.wizard.current_step_index(), 0);
            assert_eq!(page.form().values().text("firstName"), "");
        }
    }
}
