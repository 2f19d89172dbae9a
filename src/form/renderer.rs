//! Field renderer: binds one field to a rendering function

use super::context::FormScope;
use super::controller::FormController;
use super::error::FormError;
use super::field::{DisplayState, FieldState};
use super::path::FieldPath;
use super::value::FieldValue;
use tokio::sync::watch;

/// What a rendering function gets to look at
#[derive(Debug)]
pub struct FieldView<'s> {
    pub path: &'s FieldPath,
    pub state: &'s FieldState,
    pub display: DisplayState,
    pub password_visible: bool,
}

impl FieldView<'_> {
    /// Error text, only once the field has been touched
    pub fn error(&self) -> Option<&str> {
        self.state.visible_error()
    }

    /// Display text, masked for password fields unless revealed
    pub fn display_text(&self, is_password: bool) -> String {
        let text = self.state.value.display_value();
        if is_password && !self.password_visible {
            "•".repeat(text.chars().count())
        } else {
            text
        }
    }
}

type RenderFn<R> = Box<dyn FnMut(&FieldView<'_>) -> R>;

/// Re-invokes its rendering function only when the field's value, touched
/// flag or error changed (or a local toggle flipped); otherwise hands back
/// the cached output.
pub struct FieldRenderer<R> {
    path: FieldPath,
    receiver: watch::Receiver<FieldState>,
    render_fn: RenderFn<R>,
    output: Option<R>,
    password_visible: bool,
    renders: usize,
}

impl<R> FieldRenderer<R> {
    /// Subscribe to `path` on the controller provided by `scope`
    pub fn bind(
        scope: &FormScope<'_>,
        path: impl Into<FieldPath>,
        render_fn: impl FnMut(&FieldView<'_>) -> R + 'static,
    ) -> Result<Self, FormError> {
        let controller = scope.consume()?;
        let path = path.into();
        let receiver = controller.subscribe(path.as_str())?;
        Ok(Self {
            path,
            receiver,
            render_fn: Box::new(render_fn),
            output: None,
            password_visible: false,
            renders: 0,
        })
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Current output, re-rendered if the field changed since last time
    pub fn render(&mut self) -> &R {
        // A closed channel means the form is gone; keep showing what we have
        let changed = self.receiver.has_changed().unwrap_or(false);
        let output = match self.output.take() {
            Some(output) if !changed => output,
            _ => {
                let state = self.receiver.borrow_and_update();
                let view = FieldView {
                    path: &self.path,
                    state: &state,
                    display: state.display_state(),
                    password_visible: self.password_visible,
                };
                self.renders += 1;
                (self.render_fn)(&view)
            }
        };
        self.output.insert(output)
    }

    /// How many times the rendering function has run
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn state(&self) -> FieldState {
        self.receiver.borrow().clone()
    }

    pub fn display_state(&self) -> DisplayState {
        self.receiver.borrow().display_state()
    }

    pub fn is_password_visible(&self) -> bool {
        self.password_visible
    }

    pub fn toggle_password_visibility(&mut self) {
        self.password_visible = !self.password_visible;
        self.output = None;
    }

    /// Replace the value (user typed or picked something)
    pub fn input(
        &self,
        controller: &mut FormController,
        value: impl Into<FieldValue>,
    ) -> Result<(), FormError> {
        controller.set_value(self.path.as_str(), value)
    }

    /// Edit the value in place
    pub fn edit(
        &self,
        controller: &mut FormController,
        edit: impl FnOnce(&mut FieldValue),
    ) -> Result<(), FormError> {
        controller.update_value(self.path.as_str(), edit)
    }

    /// Focus left the field
    pub fn blur(&self, controller: &mut FormController) -> Result<(), FormError> {
        controller.mark_touched(self.path.as_str())
    }
}

impl<R> std::fmt::Debug for FieldRenderer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRenderer")
            .field("path", &self.path)
            .field("password_visible", &self.password_visible)
            .field("renders", &self.renders)
            .finish()
    }
}
