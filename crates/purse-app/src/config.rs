//! Application configuration.
//!
//! Loaded from TOML. Every field has a default, so an absent file or an
//! empty table yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use purse_core::{PollPolicy, DEFAULT_TOAST_DURATION_MS};

use crate::errors::AppError;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Tunables for the coordination layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How long toasts stay on screen
    pub toast_duration_ms: u64,
    /// Probe budget when waiting for an order to materialize
    pub poll_max_attempts: u32,
    /// Delay between order probes
    pub poll_interval_ms: u64,
    /// Items requested per list page
    pub page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            poll_max_attempts: PollPolicy::DEFAULT_MAX_ATTEMPTS,
            poll_interval_ms: PollPolicy::DEFAULT_INTERVAL_MS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, AppError> {
        let config: Self = toml::from_str(source)
            .map_err(|e| AppError::config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let source = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Reject values the coordination layer cannot honour.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page_size == 0 {
            return Err(AppError::config("page_size must be at least 1"));
        }
        PollPolicy::new(self.poll_max_attempts, self.poll_interval_ms)?;
        Ok(())
    }

    /// Polling policy for order materialization.
    pub fn poll_policy(&self) -> Result<PollPolicy, AppError> {
        Ok(PollPolicy::new(self.poll_max_attempts, self.poll_interval_ms)?)
    }
}
