#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Every tunable constant of the walkthrough engine lives in
//! [`EngineConfig`], loadable from TOML or JSON at startup.
//!
//! ```toml
//! # guidepost.toml
//! spotlight_padding = 8.0
//! poll_interval_ms = 100
//! storage_key = "completedTutorials"
//!
//! [placement]
//! card_width = 380.0
//! card_height = 200.0
//! gap = 16.0
//! margin = 16.0
//! ```
//!
//! # Defaults
//!
//! `EngineConfig::default()` reproduces the shipped behavior: an 8-unit
//! spotlight padding, a 100 ms refresh poll, and a 380x200 card placed 16
//! units from its anchor.

use std::path::Path;
use std::time::Duration;

use guidepost_core::placement::PlacementConfig;
use serde::{Deserialize, Serialize};

use crate::completion::DEFAULT_STORAGE_KEY;

/// Padding added around the anchor's bounding box.
pub const DEFAULT_SPOTLIGHT_PADDING: f64 = 8.0;
/// Spotlight re-measure period.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Tunable engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub spotlight_padding: f64,
    pub poll_interval_ms: u64,
    pub storage_key: String,
    pub placement: PlacementConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spotlight_padding: DEFAULT_SPOTLIGHT_PADDING,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            placement: PlacementConfig::default(),
        }
    }
}

/// Failure loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.spotlight_padding.is_finite() || self.spotlight_padding < 0.0 {
            errors.push(format!(
                "spotlight_padding must be finite and >= 0, got {}",
                self.spotlight_padding
            ));
        }
        if self.poll_interval_ms == 0 {
            errors.push("poll_interval_ms must be > 0".into());
        }
        if self.storage_key.trim().is_empty() {
            errors.push("storage_key must not be empty".into());
        }

        let p = &self.placement;
        for (name, value) in [("card_width", p.card_width), ("card_height", p.card_height)] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("placement.{name} must be > 0, got {value}"));
            }
        }
        for (name, value) in [("gap", p.gap), ("margin", p.margin)] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("placement.{name} must be >= 0, got {value}"));
            }
        }

        errors
    }
}
