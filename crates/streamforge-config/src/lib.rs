//! Configuration system for StreamForge.
//!
//! Load score director configuration from TOML or YAML to control
//! assertion levels, constraint match tracking and constraint weights
//! without code changes.
//!
//! # Examples
//!
//! ```
//! use streamforge_config::{EnvironmentMode, ScoreDirectorConfig};
//!
//! let config = ScoreDirectorConfig::from_toml_str(r#"
//!     environment_mode = "full_assert"
//!     constraint_match_enabled = true
//!
//!     [constraint_weights]
//!     "Room conflict" = "-2hard/0soft"
//! "#).unwrap();
//!
//! assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
//! assert!(config.constraint_match_enabled);
//! assert_eq!(config.constraint_weights["Room conflict"], "-2hard/0soft");
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use streamforge_config::ScoreDirectorConfig;
//!
//! let config = ScoreDirectorConfig::load("scoring.toml").unwrap_or_default();
//! assert!(!config.constraint_match_enabled);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Score director configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoreDirectorConfig {
    /// Environment mode controlling score corruption assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Whether live constraint matches are tracked for explanation.
    #[serde(default)]
    pub constraint_match_enabled: bool,

    /// Constraint weight overrides, keyed by constraint full name, written
    /// in the score type's string format.
    #[serde(default)]
    pub constraint_weights: BTreeMap<String, String>,
}

impl ScoreDirectorConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Enables or disables constraint match tracking.
    pub fn with_constraint_match_enabled(mut self, enabled: bool) -> Self {
        self.constraint_match_enabled = enabled;
        self
    }

    /// Adds a constraint weight override.
    pub fn with_constraint_weight(
        mut self,
        constraint: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        self.constraint_weights
            .insert(constraint.into(), weight.into());
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, weight) in &self.constraint_weights {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "constraint weight override with an empty constraint name".to_string(),
                ));
            }
            if weight.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "constraint weight override for '{}' is empty",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Environment mode affecting score director assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// No assertions.
    #[default]
    NonReproducible,

    /// No assertions; deterministic iteration order.
    Reproducible,

    /// Every calculated score is checked against a from-scratch rebuild.
    FastAssert,

    /// Like `FastAssert`, and the check also runs after every after-hook.
    FullAssert,
}

impl EnvironmentMode {
    /// Returns true if calculated scores are cross-checked.
    pub fn is_asserted(self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }

    /// Returns true if every lifecycle hook is cross-checked.
    pub fn is_fully_asserted(self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }
}

#[cfg(test)]
mod tests;
