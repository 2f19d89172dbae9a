//! Form domain layer
//!
//! Generic form state, schema validation and a multi-step wizard:
//! - `controller`: owns field state, runs validation at trigger points, submits
//! - `context`: scoped handle that makes a controller reachable from nested renderers
//! - `renderer`: binds one field to a rendering function with pristine/valid/invalid state
//! - `wizard`: ordered steps gated on validating the current step's fields
//! - `validator`: validation contract plus a rule-based schema

mod context;
mod controller;
mod error;
mod field;
mod path;
mod registry;
mod renderer;
mod submit;
mod validator;
mod value;
mod wizard;

pub use context::FormScope;
pub use controller::{FormController, SubmissionStatus, ValidationMode};
pub use error::{ContextMissingError, FormError, ValidationErrors};
pub use field::{DisplayState, FieldState};
pub use path::FieldPath;
pub use registry::FieldRegistry;
pub use renderer::{FieldRenderer, FieldView};
pub use submit::{handler_fn, FnHandler, SubmissionHandler};
pub use validator::{Refinement, Rule, Schema, ValidationIssue, ValidationResult, Validator};
pub use value::{FieldValue, FormValues};
pub use wizard::{StepDefinition, WizardController};

#[cfg(test)]
pub use submit::MockSubmissionHandler;
#[cfg(test)]
pub use validator::MockValidator;
