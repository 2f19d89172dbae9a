//! Field layout: what each form shows and how a field turns into text

use formwizard::form::{DisplayState, FieldValue, FieldView};
use formwizard::registration::{COUNTRIES, GENDERS};

/// (value, label) pairs of a choice field
pub type Choices = &'static [(&'static str, &'static str)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
    Choice(Choices),
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub path: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn new(
        path: &'static str,
        label: &'static str,
        placeholder: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            path,
            label,
            placeholder,
            kind,
            required: true,
        }
    }

    pub fn is_password(&self) -> bool {
        self.kind == FieldKind::Password
    }
}

pub const SIMPLE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Full Name", "Enter your full name", FieldKind::Text),
    FieldSpec::new("email", "Email", "Enter your email", FieldKind::Text),
    FieldSpec::new("password", "Password", "Enter your password", FieldKind::Password),
];

pub const PERSONAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("firstName", "First Name", "Enter your first name", FieldKind::Text),
    FieldSpec::new("lastName", "Last Name", "Enter your last name", FieldKind::Text),
    FieldSpec::new("dateOfBirth", "Date of Birth", "Pick a date", FieldKind::Date),
    FieldSpec::new("gender", "Gender", "Select a gender", FieldKind::Choice(&GENDERS)),
];

pub const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("email", "Email", "Enter your email", FieldKind::Text),
    FieldSpec::new("phone", "Phone", "Enter your phone number", FieldKind::Text),
    FieldSpec::new("address", "Address", "Enter your address", FieldKind::Text),
    FieldSpec::new("city", "City", "Enter your city", FieldKind::Text),
    FieldSpec::new(
        "country",
        "Country",
        "Select a country",
        FieldKind::Choice(&COUNTRIES),
    ),
];

pub const ACCOUNT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("username", "Username", "Choose a username", FieldKind::Text),
    FieldSpec::new("password", "Password", "Create a password", FieldKind::Password),
    FieldSpec::new(
        "confirmPassword",
        "Confirm Password",
        "Confirm your password",
        FieldKind::Password,
    ),
];

/// Wizard fields, one slice per step in step order
pub const WIZARD_STEP_FIELDS: [&[FieldSpec]; 3] = [PERSONAL_FIELDS, CONTACT_FIELDS, ACCOUNT_FIELDS];

/// What the draw code needs to paint one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDisplay {
    pub text: String,
    pub state: DisplayState,
    pub error: Option<String>,
    pub revealed: bool,
}

/// Rendering function for a field renderer bound to `spec`
pub fn display_fn(spec: FieldSpec) -> impl FnMut(&FieldView<'_>) -> FieldDisplay + 'static {
    move |view| {
        let text = match spec.kind {
            FieldKind::Choice(choices) => {
                choice_label(choices, view.state.value.as_text()).to_string()
            }
            _ => view.display_text(spec.is_password()),
        };
        FieldDisplay {
            text,
            state: view.display,
            error: view.error().map(str::to_string),
            revealed: view.password_visible,
        }
    }
}

/// Label for `value`, empty when it is not one of the choices
pub fn choice_label(choices: Choices, value: &str) -> &'static str {
    choices
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or("")
}

/// Move a choice field `step` options along, wrapping around.
/// An unset field starts from the first (or last) option.
pub fn cycle_choice(choices: Choices, value: &mut FieldValue, step: isize) {
    if choices.is_empty() {
        return;
    }
    let len = choices.len() as isize;
    let next = match choices.iter().position(|(v, _)| *v == value.as_text()) {
        Some(index) => (index as isize + step).rem_euclid(len),
        None if step >= 0 => 0,
        None => len - 1,
    };
    *value = FieldValue::from(choices[next as usize].0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwizard::form::{FieldPath, FieldState};
    use pretty_assertions::assert_eq;

    fn view_of<'s>(path: &'s FieldPath, state: &'s FieldState, revealed: bool) -> FieldView<'s> {
        FieldView {
            path,
            state,
            display: state.display_state(),
            password_visible: revealed,
        }
    }

    #[test]
    fn test_wizard_steps_match_registration_steps() {
        let steps = formwizard::registration::registration_steps();
        for (step, specs) in steps.iter().zip(WIZARD_STEP_FIELDS) {
            let paths: Vec<&str> = specs.iter().map(|s| s.path).collect();
            let expected: Vec<&str> = step.field_paths.iter().map(|p| p.as_str()).collect();
            assert_eq!(paths, expected);
        }
    }

    #[test]
    fn test_choice_display_uses_label() {
        let spec = CONTACT_FIELDS[4];
        let path = FieldPath::from("country");
        let state = FieldState::new("uk".into());
        let display = display_fn(spec)(&view_of(&path, &state, false));
        assert_eq!(display.text, "United Kingdom");
        assert_eq!(display.state, DisplayState::Pristine);
    }

    #[test]
    fn test_password_masked_until_revealed() {
        let spec = SIMPLE_FIELDS[2];
        let path = FieldPath::from("password");
        let state = FieldState::new("Secret1x".into());
        let mut render = display_fn(spec);
        assert_eq!(render(&view_of(&path, &state, false)).text, "••••••••");
        let shown = render(&view_of(&path, &state, true));
        assert_eq!(shown.text, "Secret1x");
        assert!(shown.revealed);
    }

    #[test]
    fn test_cycle_choice_wraps() {
        let mut value = FieldValue::from("other");
        cycle_choice(&GENDERS, &mut value, 1);
        assert_eq!(value.as_text(), "male");
        cycle_choice(&GENDERS, &mut value, -1);
        assert_eq!(value.as_text(), "other");
    }

    #[test]
    fn test_cycle_choice_from_unset() {
        let mut forward = FieldValue::default();
        cycle_choice(&COUNTRIES, &mut forward, 1);
        assert_eq!(forward.as_text(), "us");

        let mut backward = FieldValue::default();
        cycle_choice(&COUNTRIES, &mut backward, -1);
        assert_eq!(backward.as_text(), "au");
    }
}
