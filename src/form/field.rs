//! Per-field state

use super::value::FieldValue;

/// Current state of a single field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: FieldValue,
    /// Set once the field loses focus or the form is submitted
    pub touched: bool,
    /// Written only by validation passes and explicit error operations
    pub error: Option<String>,
}

impl FieldState {
    pub fn new(value: FieldValue) -> Self {
        Self {
            value,
            touched: false,
            error: None,
        }
    }

    pub fn display_state(&self) -> DisplayState {
        match (self.touched, self.error.is_some()) {
            (false, _) => DisplayState::Pristine,
            (true, false) => DisplayState::Valid,
            (true, true) => DisplayState::Invalid,
        }
    }

    /// Error text eligible for display; untouched fields never show one
    pub fn visible_error(&self) -> Option<&str> {
        if self.touched {
            self.error.as_deref()
        } else {
            None
        }
    }
}

/// Visual affordance derived from touched/error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Pristine,
    Valid,
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_is_pristine_even_with_error() {
        let state = FieldState {
            value: FieldValue::from("bad"),
            touched: false,
            error: Some("Invalid".to_string()),
        };
        assert_eq!(state.display_state(), DisplayState::Pristine);
        assert!(state.visible_error().is_none());
    }

    #[test]
    fn test_touched_without_error_is_valid() {
        let state = FieldState {
            touched: true,
            ..FieldState::default()
        };
        assert_eq!(state.display_state(), DisplayState::Valid);
    }

    #[test]
    fn test_touched_with_error_is_invalid() {
        let state = FieldState {
            value: FieldValue::from("bad"),
            touched: true,
            error: Some("Invalid".to_string()),
        };
        assert_eq!(state.display_state(), DisplayState::Invalid);
        assert_eq!(state.visible_error(), Some("Invalid"));
    }
}
