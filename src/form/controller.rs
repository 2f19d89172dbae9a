//! Form controller: owns field state and decides when validation runs

use super::error::FormError;
use super::field::FieldState;
use super::path::FieldPath;
use super::registry::FieldRegistry;
use super::submit::SubmissionHandler;
use super::validator::{ValidationResult, Validator};
use super::value::{FieldValue, FormValues};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// When field-level validation runs on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    /// Validate a field when it loses focus
    #[default]
    OnBlur,
    /// Validate a field on every value change
    OnChange,
    /// Only validate on submit, step transitions or explicit calls
    OnSubmit,
    /// Both on blur and on change
    All,
}

impl ValidationMode {
    fn validates_on_blur(self) -> bool {
        matches!(self, ValidationMode::OnBlur | ValidationMode::All)
    }

    fn validates_on_change(self) -> bool {
        matches!(self, ValidationMode::OnChange | ValidationMode::All)
    }
}

/// Top-level submission state backing the loading/success/error banners
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Store `next` and notify subscribers, unless nothing changes
fn publish(status: &watch::Sender<SubmissionStatus>, next: SubmissionStatus) {
    status.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}

/// Puts the status back to idle if a submission is abandoned mid-flight
struct SubmittingGuard<'a> {
    status: &'a watch::Sender<SubmissionStatus>,
}

impl<'a> SubmittingGuard<'a> {
    fn begin(status: &'a watch::Sender<SubmissionStatus>) -> Self {
        publish(status, SubmissionStatus::Submitting);
        Self { status }
    }

    fn finish(self, outcome: SubmissionStatus) {
        publish(self.status, outcome);
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.status.send_if_modified(|current| {
            if *current == SubmissionStatus::Submitting {
                *current = SubmissionStatus::Idle;
                true
            } else {
                false
            }
        });
    }
}

pub struct FormController {
    session: Uuid,
    registry: FieldRegistry,
    defaults: FormValues,
    validator: Arc<dyn Validator>,
    mode: ValidationMode,
    status: watch::Sender<SubmissionStatus>,
    submit_count: u32,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("session", &self.session)
            .field("mode", &self.mode)
            .field("status", &*self.status.borrow())
            .field("submit_count", &self.submit_count)
            .field("values", &self.registry.snapshot())
            .finish()
    }
}

impl FormController {
    /// Create a controller seeded from default values. Only fields present
    /// in `defaults` are registered.
    pub fn new(defaults: FormValues, validator: impl Validator + 'static) -> Self {
        Self::with_shared_validator(defaults, Arc::new(validator))
    }

    pub fn with_shared_validator(defaults: FormValues, validator: Arc<dyn Validator>) -> Self {
        let session = Uuid::new_v4();
        tracing::debug!(%session, fields = defaults.len(), "form session created");
        Self {
            session,
            registry: FieldRegistry::from_defaults(&defaults),
            defaults,
            validator,
            mode: ValidationMode::default(),
            status: watch::channel(SubmissionStatus::Idle).0,
            submit_count: 0,
        }
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ValidationMode) {
        self.mode = mode;
    }

    pub fn field_paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.registry.paths()
    }

    pub fn has_field(&self, path: &str) -> bool {
        self.registry.contains(path)
    }

    pub fn get_value(&self, path: &str) -> Option<FieldValue> {
        self.registry.with_state(path, |state| state.value.clone())
    }

    pub fn field_state(&self, path: &str) -> Option<FieldState> {
        self.registry.state(path)
    }

    /// Snapshot of all current values
    pub fn values(&self) -> FormValues {
        self.registry.snapshot()
    }

    pub fn defaults(&self) -> &FormValues {
        &self.defaults
    }

    /// Observe one field; the receiver is notified whenever its value,
    /// touched flag or error changes.
    pub fn subscribe(&self, path: &str) -> Result<watch::Receiver<FieldState>, FormError> {
        self.registry
            .subscribe(path)
            .ok_or_else(|| FormError::UnknownField(path.into()))
    }

    pub fn set_value(&mut self, path: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        let value = value.into();
        let changed = self
            .registry
            .update(path, |state| {
                if state.value == value {
                    false
                } else {
                    state.value = value;
                    true
                }
            })
            .ok_or_else(|| FormError::UnknownField(path.into()))?;

        if changed && self.revalidates_on_change() {
            self.validate(Some(&[FieldPath::from(path)]));
        }
        Ok(())
    }

    /// Edit a field's value in place, then apply it as with [`Self::set_value`]
    pub fn update_value(
        &mut self,
        path: &str,
        edit: impl FnOnce(&mut FieldValue),
    ) -> Result<(), FormError> {
        let mut value = self
            .get_value(path)
            .ok_or_else(|| FormError::UnknownField(path.into()))?;
        edit(&mut value);
        self.set_value(path, value)
    }

    pub fn mark_touched(&mut self, path: &str) -> Result<(), FormError> {
        self.registry
            .update(path, |state| !std::mem::replace(&mut state.touched, true))
            .ok_or_else(|| FormError::UnknownField(path.into()))?;

        if self.mode.validates_on_blur() {
            self.validate(Some(&[FieldPath::from(path)]));
        }
        Ok(())
    }

    /// Mark fields touched without validating them; `None` means all fields
    pub fn touch(&mut self, paths: Option<&[FieldPath]>) {
        self.registry.update_all(|path, state| {
            let included = paths.is_none_or(|paths| paths.contains(path));
            included && !std::mem::replace(&mut state.touched, true)
        });
    }

    /// Run the validator over the full snapshot and write back errors for
    /// the projected fields only (all fields when `paths` is `None`).
    ///
    /// Prior errors of projected fields are cleared first; the first
    /// message reported for a field wins.
    pub fn validate(&mut self, paths: Option<&[FieldPath]>) -> ValidationResult {
        let snapshot = self.registry.snapshot();
        let issues = self.validator.validate(&snapshot).err().unwrap_or_default();
        let included = |path: &FieldPath| paths.is_none_or(|paths| paths.contains(path));
        let result = ValidationResult::from_issues(&issues, included);

        self.registry.update_all(|path, state| {
            if !included(path) {
                return false;
            }
            let error = result.errors.get(path).cloned();
            if state.error == error {
                false
            } else {
                state.error = error;
                true
            }
        });

        tracing::debug!(
            session = %self.session,
            scope = ?paths.map(|p| p.iter().map(FieldPath::as_str).collect::<Vec<_>>()),
            valid = result.valid,
            errors = result.errors.len(),
            "validation pass"
        );
        result
    }

    /// Attach an error to a field outside of a validation pass
    pub fn set_error(&mut self, path: &str, message: impl Into<String>) -> Result<(), FormError> {
        let message = message.into();
        self.registry
            .update(path, |state| {
                if state.error.as_deref() == Some(message.as_str()) {
                    false
                } else {
                    state.error = Some(message);
                    true
                }
            })
            .map(|_| ())
            .ok_or_else(|| FormError::UnknownField(path.into()))
    }

    /// Clear errors of the given fields, or of every field
    pub fn clear_errors(&mut self, paths: Option<&[FieldPath]>) {
        self.registry.update_all(|path, state| {
            let included = paths.is_none_or(|paths| paths.contains(path));
            included && state.error.take().is_some()
        });
    }

    /// Restore defaults (or `values` merged over them, which become the new
    /// defaults), clear touched flags, errors and submission state.
    pub fn reset(&mut self, values: Option<FormValues>) {
        if let Some(values) = values {
            for (path, value) in values.iter() {
                if self.registry.contains(path.as_str()) {
                    self.defaults.insert(path, value.clone());
                } else {
                    tracing::warn!(session = %self.session, %path, "reset value for unknown field ignored");
                }
            }
        }

        let defaults = &self.defaults;
        self.registry.update_all(|path, state| {
            let fresh = FieldState::new(defaults.get(path.as_str()).cloned().unwrap_or_default());
            if *state == fresh {
                false
            } else {
                *state = fresh;
                true
            }
        });
        publish(&self.status, SubmissionStatus::Idle);
        self.submit_count = 0;
        tracing::debug!(session = %self.session, "form reset");
    }

    pub fn is_dirty(&self) -> bool {
        self.registry.paths().any(|path| self.is_field_dirty(path.as_str()))
    }

    pub fn is_field_dirty(&self, path: &str) -> bool {
        self.registry
            .with_state(path, |state| Some(&state.value) != self.defaults.get(path))
            .unwrap_or(false)
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status.borrow().clone()
    }

    /// Observe the submission status. The receiver sees `Submitting` while
    /// the handler is running, which nothing holding the controller can.
    pub fn subscribe_status(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    pub fn is_submitting(&self) -> bool {
        *self.status.borrow() == SubmissionStatus::Submitting
    }

    pub fn is_submit_successful(&self) -> bool {
        *self.status.borrow() == SubmissionStatus::Succeeded
    }

    /// Message of the last failed submission, if the last one failed
    pub fn submission_error(&self) -> Option<String> {
        match &*self.status.borrow() {
            SubmissionStatus::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Validate everything and hand the snapshot to `handler` when valid.
    ///
    /// All fields become touched so their errors are visible. A handler
    /// failure is recorded as the submission error and returned; field
    /// values are left as entered.
    pub async fn submit<H>(&mut self, handler: &H) -> Result<(), FormError>
    where
        H: SubmissionHandler + ?Sized,
    {
        self.submit_count += 1;
        publish(&self.status, SubmissionStatus::Idle);
        self.touch(None);

        let result = self.validate(None);
        if !result.valid {
            tracing::debug!(
                session = %self.session,
                errors = result.errors.len(),
                "submission blocked by validation"
            );
            return Err(FormError::Validation(result.into_errors()));
        }

        let snapshot = self.registry.snapshot();
        let session = self.session;
        tracing::info!(%session, attempt = self.submit_count, "submitting form");

        let guard = SubmittingGuard::begin(&self.status);
        match handler.submit(snapshot).await {
            Ok(()) => {
                tracing::info!(%session, "form submitted");
                guard.finish(SubmissionStatus::Succeeded);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(%session, error = %err, "form submission failed");
                guard.finish(SubmissionStatus::Failed(message.clone()));
                Err(FormError::Submission(message))
            }
        }
    }

    /// After the first submit attempt every edited field re-validates on
    /// change, whatever the mode.
    fn revalidates_on_change(&self) -> bool {
        self.mode.validates_on_change() || self.submit_count > 0
    }
}
