//! Multi-step wizard on top of a form controller
//!
//! Forward navigation validates only the fields of the current step; going
//! back never validates. Final submission validates every field, and when
//! that fails the wizard moves to the first step that owns an invalid field
//! so its errors are on screen.

use super::controller::FormController;
use super::error::FormError;
use super::path::FieldPath;
use super::submit::SubmissionHandler;

/// A named group of fields shown together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: String,
    pub title: String,
    pub field_paths: Vec<FieldPath>,
}

impl StepDefinition {
    pub fn new<P: Into<FieldPath>>(
        id: impl Into<String>,
        title: impl Into<String>,
        field_paths: impl IntoIterator<Item = P>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            field_paths: field_paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.field_paths.iter().any(|p| p.as_str() == path)
    }
}

#[derive(Debug)]
pub struct WizardController {
    form: FormController,
    steps: Vec<StepDefinition>,
    current: usize,
    completed: bool,
}

impl WizardController {
    /// Steps must be non-empty and only name fields the form registered
    pub fn new(form: FormController, steps: Vec<StepDefinition>) -> Result<Self, FormError> {
        if steps.is_empty() {
            return Err(FormError::EmptyWizard);
        }
        for step in &steps {
            if let Some(path) = step.field_paths.iter().find(|p| !form.has_field(p.as_str())) {
                return Err(FormError::UnknownStepField {
                    step: step.id.clone(),
                    path: path.clone(),
                });
            }
        }
        Ok(Self {
            form,
            steps,
            current: 0,
            completed: false,
        })
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn current_step_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &StepDefinition {
        &self.steps[self.current]
    }

    pub fn is_first_step(&self) -> bool {
        self.current == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    /// (1-based current step, number of steps)
    pub fn progress(&self) -> (usize, usize) {
        (self.current + 1, self.steps.len())
    }

    /// Index of the step that owns `path`
    pub fn step_of(&self, path: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.contains(path))
    }

    /// True once a final submission succeeded (until the next reset)
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Validate the current step and advance when it is valid.
    ///
    /// The step's fields are marked touched so any errors become visible.
    /// Returns whether the wizard moved; always false on the last step.
    pub fn next(&mut self) -> bool {
        if self.is_last_step() {
            return false;
        }
        let step = &self.steps[self.current];
        self.form.touch(Some(&step.field_paths));
        let result = self.form.validate(Some(&step.field_paths));
        if !result.valid {
            tracing::debug!(
                step = %step.id,
                errors = result.errors.len(),
                "step transition blocked"
            );
            return false;
        }
        self.current += 1;
        tracing::debug!(
            from = %step.id,
            to = %self.steps[self.current].id,
            "advanced to next step"
        );
        true
    }

    /// Go to the previous step without validating or touching anything
    pub fn back(&mut self) -> bool {
        if self.is_first_step() {
            return false;
        }
        self.current -= 1;
        tracing::debug!(to = %self.steps[self.current].id, "went back a step");
        true
    }

    /// Submit the whole form regardless of which steps were visited
    pub async fn submit_final<H>(&mut self, handler: &H) -> Result<(), FormError>
    where
        H: SubmissionHandler + ?Sized,
    {
        match self.form.submit(handler).await {
            Ok(()) => {
                self.completed = true;
                self.current = self.steps.len() - 1;
                Ok(())
            }
            Err(FormError::Validation(errors)) => {
                if let Some(step) = errors.paths().filter_map(|p| self.step_of(p.as_str())).min() {
                    tracing::debug!(step = %self.steps[step].id, "jumping to first invalid step");
                    self.current = step;
                }
                Err(FormError::Validation(errors))
            }
            Err(err) => Err(err),
        }
    }

    /// Reset every field and return to the first step
    pub fn reset_wizard(&mut self) {
        self.form.reset(None);
        self.current = 0;
        self.completed = false;
    }
}
