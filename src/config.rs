//! Solver configuration
//!
//! Settings can be built in code or loaded from YAML:
//!
//! ```
//! use std::time::Duration;
//!
//! use picklist::config::SolverConfig;
//!
//! # fn main() -> Result<(), picklist::config::ConfigError> {
//! let config = SolverConfig::from_yaml_str(
//!     r"
//! time_limit_secs: 5
//! escalation:
//!   max_attempts: 4
//! weights:
//!   replenishment: 5
//! ",
//! )?;
//!
//! assert_eq!(config.time_limit(), Duration::from_secs(5));
//! assert_eq!(config.attempt_time_limit(3), Duration::from_secs(15));
//! # Ok(())
//! # }
//! ```

use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use crate::containers::ContainerCategory;

/// Default time budget for a single solve attempt, in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 10;

/// Default number of attempts made by the escalating driver.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default big-M used to link container usage to container flow.
pub const DEFAULT_BIG_M: f64 = 10_000_000.0;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading a configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Semantically invalid configuration
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Time budget escalation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EscalationConfig {
    /// Maximum number of build-and-solve attempts
    pub max_attempts: u32,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Weight applied to a container's flow in its usage link, per category.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerWeights {
    /// Weight for standard containers
    pub standard: f64,

    /// Weight for replenishment containers
    pub replenishment: f64,
}

impl Default for ContainerWeights {
    fn default() -> Self {
        Self {
            standard: 1.0,
            replenishment: 3.0,
        }
    }
}

impl ContainerWeights {
    /// Weight for the given category.
    pub fn weight(&self, category: ContainerCategory) -> f64 {
        match category {
            ContainerCategory::Standard => self.standard,
            ContainerCategory::Replenishment => self.replenishment,
        }
    }
}

/// Pick list solver configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Time budget for a single attempt, in seconds
    pub time_limit_secs: u64,

    /// Escalation settings
    pub escalation: EscalationConfig,

    /// Usage link weights
    pub weights: ContainerWeights,

    /// Big-M constant for the usage link
    pub big_m: f64,

    /// Give each container's usage link its own `M` just above its largest flow
    pub tighten_big_m: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            escalation: EscalationConfig::default(),
            weights: ContainerWeights::default(),
            big_m: DEFAULT_BIG_M,
            tighten_big_m: true,
        }
    }
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the configuration is invalid.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_norway::from_str(s)?;

        config.validate()?;

        Ok(config)
    }

    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the configuration is invalid.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Sets the per-attempt time budget, in whole seconds.
    #[must_use]
    pub fn with_time_limit_secs(mut self, seconds: u64) -> Self {
        self.time_limit_secs = seconds;
        self
    }

    /// Sets the maximum number of escalation attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.escalation.max_attempts = max_attempts;
        self
    }

    /// Sets the usage link weights.
    #[must_use]
    pub fn with_weights(mut self, weights: ContainerWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the big-M constant.
    #[must_use]
    pub fn with_big_m(mut self, big_m: f64) -> Self {
        self.big_m = big_m;
        self
    }

    /// Sets whether usage links use a per-container `M` instead of `big_m`.
    #[must_use]
    pub fn with_tighten_big_m(mut self, tighten: bool) -> Self {
        self.tighten_big_m = tighten;
        self
    }

    /// Base time budget for one attempt.
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    /// Time budget for the given 1-based attempt: `base * attempt`.
    pub fn attempt_time_limit(&self, attempt: u32) -> Duration {
        self.time_limit().saturating_mul(attempt.max(1))
    }

    /// Check the configuration for values the model cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.escalation.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "escalation.max_attempts must be at least 1".to_string(),
            ));
        }

        if !(self.big_m.is_finite() && self.big_m > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "big_m must be a positive finite number, got {}",
                self.big_m
            )));
        }

        for (name, weight) in [
            ("standard", self.weights.standard),
            ("replenishment", self.weights.replenishment),
        ] {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "weights.{name} must be a positive finite number, got {weight}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_match_reference_policy() {
        let config = SolverConfig::default();

        assert_eq!(config.time_limit(), Duration::from_secs(10));
        assert_eq!(config.escalation.max_attempts, 3);
        assert_eq!(config.weights, ContainerWeights::default());
        assert!(config.tighten_big_m);

        let replenishment = config.weights.weight(ContainerCategory::Replenishment);
        assert!((replenishment - 3.0).abs() < f64::EPSILON);
        assert!((config.big_m - 10_000_000.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_yaml_yields_defaults() -> TestResult {
        let config = SolverConfig::from_yaml_str("{}")?;

        assert_eq!(config, SolverConfig::default());

        Ok(())
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() -> TestResult {
        let config = SolverConfig::from_yaml_str("weights:\n  replenishment: 7\n")?;

        assert!((config.weights.replenishment - 7.0).abs() < f64::EPSILON);
        assert!((config.weights.standard - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.escalation.max_attempts, DEFAULT_MAX_ATTEMPTS);

        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = SolverConfig::from_yaml_str("time_limit: 5\n");

        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let result = SolverConfig::from_yaml_str("escalation:\n  max_attempts: 0\n");

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn non_positive_weights_are_invalid() {
        let config = SolverConfig::default().with_weights(ContainerWeights {
            standard: 0.0,
            replenishment: 3.0,
        });

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn attempt_budget_grows_linearly() {
        let config = SolverConfig::default().with_time_limit_secs(10);

        assert_eq!(config.attempt_time_limit(1), Duration::from_secs(10));
        assert_eq!(config.attempt_time_limit(2), Duration::from_secs(20));
        assert_eq!(config.attempt_time_limit(3), Duration::from_secs(30));
        assert_eq!(config.attempt_time_limit(0), Duration::from_secs(10));
    }

    #[test]
    fn loads_from_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "time_limit_secs: 2\nbig_m: 1000\ntighten_big_m: false")?;

        let config = SolverConfig::from_yaml_file(file.path())?;

        assert_eq!(config.time_limit(), Duration::from_secs(2));
        assert!((config.big_m - 1000.0).abs() < f64::EPSILON);
        assert!(!config.tighten_big_m);

        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SolverConfig::from_yaml_file("/definitely/not/here.yml");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
