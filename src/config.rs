//! Configuration handling for the form front end

use crate::state::View;
use anyhow::Result;
use directories::ProjectDirs;
use formwizard::form::ValidationMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_SUBMIT_DELAY_MS: u64 = 1000;
const DEFAULT_LOG_FILTER: &str = "formwizard=info";

/// User configuration, every field optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormsConfig {
    /// When fields validate on their own
    pub validation_mode: Option<ValidationMode>,
    /// How long the demo backend takes to answer
    pub submit_delay_ms: Option<u64>,
    /// Make every submission fail with this message
    pub simulate_failure: Option<String>,
    /// tracing filter directive, used when RUST_LOG is unset
    pub log_filter: Option<String>,
    /// Write logs here instead of stderr
    pub log_file: Option<PathBuf>,
    /// Form shown at startup
    pub start_view: Option<View>,
}

impl FormsConfig {
    /// Where the configuration file lives on this platform
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "formwizard", "formwizard")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, defaults when there is none
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: FormsConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.validation_mode.unwrap_or_default()
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms.unwrap_or(DEFAULT_SUBMIT_DELAY_MS))
    }

    pub fn simulated_failure(&self) -> Option<&str> {
        self.simulate_failure.as_deref().filter(|msg| !msg.is_empty())
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn start_view(&self) -> View {
        self.start_view.unwrap_or_default()
    }
}
