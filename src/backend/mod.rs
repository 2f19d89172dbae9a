//! Demo registration backend
//!
//! Stands in for the server the forms would post to: reads the snapshot
//! as the form's typed registration, waits for the configured delay, logs
//! the payload, and optionally fails.

use crate::config::FormsConfig;
use crate::state::View;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use formwizard::form::{FormValues, SubmissionHandler};
use formwizard::registration::{MultiStepFormData, SimpleFormData};
use serde_json::Value;
use std::time::Duration;

/// Fields never written to the log in clear
const SECRET_FIELDS: &[&str] = &["password", "confirmPassword"];

#[derive(Debug, Clone)]
pub struct RegistrationBackend {
    /// Which registration payload this endpoint accepts
    form: View,
    delay: Duration,
    failure: Option<String>,
}

impl RegistrationBackend {
    pub fn new(form: View, delay: Duration, failure: Option<String>) -> Self {
        Self {
            form,
            delay,
            failure,
        }
    }

    pub fn from_config(config: &FormsConfig, form: View) -> Self {
        Self::new(
            form,
            config.submit_delay(),
            config.simulated_failure().map(str::to_string),
        )
    }

    /// Read the snapshot as this form's registration, secrets masked
    fn payload(&self, values: &FormValues) -> Result<Value> {
        let payload = match self.form {
            View::Simple => {
                let data: SimpleFormData = values
                    .parse()
                    .context("snapshot is not a simple registration")?;
                tracing::debug!(email = %data.email, "simple registration parsed");
                serde_json::to_value(data)?
            }
            View::Wizard => {
                let data: MultiStepFormData = values
                    .parse()
                    .context("snapshot is not a multi-step registration")?;
                tracing::debug!(
                    username = %data.username,
                    gender = ?data.gender,
                    "multi-step registration parsed"
                );
                serde_json::to_value(data)?
            }
        };
        Ok(redacted(payload))
    }
}

#[async_trait]
impl SubmissionHandler for RegistrationBackend {
    async fn submit(&self, values: FormValues) -> Result<()> {
        let payload = self.payload(&values)?;
        tokio::time::sleep(self.delay).await;

        if let Some(message) = &self.failure {
            tracing::warn!(error = %message, "registration rejected");
            bail!("{message}");
        }

        tracing::info!(form = ?self.form, %payload, "registration received");
        Ok(())
    }
}

fn redacted(mut payload: Value) -> Value {
    if let Value::Object(map) = &mut payload {
        for key in SECRET_FIELDS {
            if let Some(value) = map.get_mut(*key) {
                *value = Value::String("***".to_string());
            }
        }
    }
    payload
}
