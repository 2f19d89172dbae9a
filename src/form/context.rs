//! Scoped form context
//!
//! A [`FormScope`] is handed down through the draw/compose call tree. A
//! provider wraps a subtree with [`FormScope::provide`]; anything nested in
//! that closure can [`FormScope::consume`] the controller without it being
//! threaded through every signature. Scopes are plain values, so two forms
//! living side by side never see each other.

use super::controller::FormController;
use super::error::ContextMissingError;

#[derive(Debug, Clone, Copy, Default)]
pub struct FormScope<'a> {
    controller: Option<&'a FormController>,
    depth: usize,
}

impl<'a> FormScope<'a> {
    /// A scope with no form provided
    pub fn root() -> Self {
        Self::default()
    }

    /// Run `f` with `controller` reachable from the scope it receives.
    /// Shadows any controller provided further out, for `f` only.
    pub fn provide<'c, R>(
        &self,
        controller: &'c FormController,
        f: impl FnOnce(&FormScope<'c>) -> R,
    ) -> R {
        let inner = FormScope {
            controller: Some(controller),
            depth: self.depth + 1,
        };
        tracing::trace!(
            session = %controller.session_id(),
            depth = inner.depth,
            "form context provided"
        );
        f(&inner)
    }

    /// The nearest provided controller
    pub fn consume(&self) -> Result<&'a FormController, ContextMissingError> {
        self.controller.ok_or(ContextMissingError)
    }

    pub fn is_provided(&self) -> bool {
        self.controller.is_some()
    }

    /// How many providers enclose this scope
    pub fn depth(&self) -> usize {
        self.depth
    }
}
