#![forbid(unsafe_code)]

//! Configuration for the spring layout.
//!
//! Every tunable lives in one [`SpringLayoutConfig`] that can be loaded from
//! TOML or JSON (with the `config-files` feature):
//!
//! ```toml
//! buffer_margin = 100.0
//! track_supplementary = true
//!
//! [spring]
//! length = 0.0
//! damping = 0.8
//! frequency = 1.0
//!
//! [reaction]
//! resistance = 1500.0
//! limit_enabled = false
//! limit = 5.0
//! ```
//!
//! `SpringLayoutConfig::default()` matches the values above.

#[cfg(feature = "config-files")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wavegrid_dynamics::SpringParams;

use crate::reaction::ScrollReactionConfig;

/// Margin added on each side of the viewport before deciding what is active.
pub const DEFAULT_BUFFER_MARGIN: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringLayoutConfig {
    /// Extra units around the visible viewport whose elements get springs
    /// too, so items are already live when they scroll into view.
    pub buffer_margin: f64,
    /// Attach springs to supplementary elements (section headers) as well.
    pub track_supplementary: bool,
    /// Spring used for every new attachment.
    pub spring: SpringParams,
    /// Scroll reaction tuning.
    pub reaction: ScrollReactionConfig,
}

impl Default for SpringLayoutConfig {
    fn default() -> Self {
        Self {
            buffer_margin: DEFAULT_BUFFER_MARGIN,
            track_supplementary: true,
            spring: SpringParams::default(),
            reaction: ScrollReactionConfig::default(),
        }
    }
}

impl SpringLayoutConfig {
    /// Load from a TOML string and validate.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk and validate.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.buffer_margin.is_finite() || self.buffer_margin < 0.0 {
            errors.push(format!(
                "buffer_margin must be finite and >= 0, got {}",
                self.buffer_margin
            ));
        }

        let spring = &self.spring;
        if !spring.length.is_finite() || spring.length < 0.0 {
            errors.push(format!("spring.length must be >= 0, got {}", spring.length));
        }
        if !spring.damping.is_finite() || spring.damping < 0.0 {
            errors.push(format!("spring.damping must be >= 0, got {}", spring.damping));
        }
        if !spring.frequency.is_finite() || spring.frequency <= 0.0 {
            errors.push(format!(
                "spring.frequency must be > 0, got {}",
                spring.frequency
            ));
        }
        if let Some(torque) = spring
            .friction_torque
            .filter(|t| !t.is_finite() || *t < 0.0)
        {
            errors.push(format!("spring.friction_torque must be >= 0, got {torque}"));
        }

        let reaction = &self.reaction;
        if !reaction.resistance.is_finite() || reaction.resistance <= 0.0 {
            errors.push(format!(
                "reaction.resistance must be > 0, got {}",
                reaction.resistance
            ));
        }
        if !reaction.limit.is_finite() || reaction.limit < 0.0 {
            errors.push(format!("reaction.limit must be >= 0, got {}", reaction.limit));
        }

        errors
    }

    #[cfg(feature = "config-files")]
    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-files")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config-files")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
