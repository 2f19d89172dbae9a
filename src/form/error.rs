//! Form error types

use super::path::FieldPath;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Per-field messages that blocked a submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FieldPath, String>);

impl ValidationErrors {
    pub fn new(errors: BTreeMap<FieldPath, String>) -> Self {
        Self(errors)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths: Vec<&str> = self.0.keys().map(FieldPath::as_str).collect();
        write!(f, "{} invalid field(s): {}", self.0.len(), paths.join(", "))
    }
}

/// Raised when a renderer looks for a form outside any provided scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("form context used outside of a scope that provides a form controller")]
pub struct ContextMissingError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Submission(String),

    #[error(transparent)]
    ContextMissing(#[from] ContextMissingError),

    #[error("unknown field: {0}")]
    UnknownField(FieldPath),

    #[error("a wizard needs at least one step")]
    EmptyWizard,

    #[error("step '{step}' refers to unknown field '{path}'")]
    UnknownStepField { step: String, path: FieldPath },
}
