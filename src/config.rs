//! Pipeline configuration.
//!
//! Loaded from YAML, then overridden from the environment:
//!
//! | Variable                 | Field                    |
//! |--------------------------|--------------------------|
//! | `COMPANION_QTABLE_PATH`  | `learner.storage_path`   |
//! | `COMPANION_PERSONA_FILE` | `persona_file`           |
//! | `COMPANION_EPSILON`      | `learner.epsilon`        |
//!
//! ```yaml
//! learner:
//!   alpha: 0.3
//!   gamma: 0.85
//!   epsilon: 0.3
//!   min_epsilon: 0.05
//!   epsilon_decay: 0.995
//!   storage_path: /var/lib/companion/qtable.json
//! persona_file: config/personas.yaml
//! record_memory: true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::utilities::paths;

pub const ENV_QTABLE_PATH: &str = "COMPANION_QTABLE_PATH";
pub const ENV_PERSONA_FILE: &str = "COMPANION_PERSONA_FILE";
pub const ENV_EPSILON: &str = "COMPANION_EPSILON";

/// Tabular learner parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerConfig {
    /// Learning rate.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Discount factor.
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// Initial exploration probability.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    #[serde(default = "default_min_epsilon")]
    pub min_epsilon: f64,

    /// Multiplied into epsilon after every update.
    #[serde(default = "default_epsilon_decay")]
    pub epsilon_decay: f64,

    /// Value table document. `None` means the platform default location.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    /// Fixed RNG seed for reproducible exploration.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_alpha() -> f64 {
    0.3
}
fn default_gamma() -> f64 {
    0.85
}
fn default_epsilon() -> f64 {
    0.3
}
fn default_min_epsilon() -> f64 {
    0.05
}
fn default_epsilon_decay() -> f64 {
    0.995
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            gamma: default_gamma(),
            epsilon: default_epsilon(),
            min_epsilon: default_min_epsilon(),
            epsilon_decay: default_epsilon_decay(),
            storage_path: None,
            seed: None,
        }
    }
}

impl LearnerConfig {
    /// Where the value table is read from and written to.
    pub fn resolved_storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(paths::default_qtable_path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be within [0, 1], got {v}")))
            }
        };

        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "alpha must be within (0, 1], got {}",
                self.alpha
            )));
        }
        in_unit("gamma", self.gamma)?;
        in_unit("epsilon", self.epsilon)?;
        in_unit("min_epsilon", self.min_epsilon)?;
        in_unit("epsilon_decay", self.epsilon_decay)?;

        if self.min_epsilon > self.epsilon {
            return Err(ConfigError::Invalid(format!(
                "min_epsilon ({}) exceeds epsilon ({})",
                self.min_epsilon, self.epsilon
            )));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionConfig {
    #[serde(default)]
    pub learner: LearnerConfig,

    /// Persona description document. `None` uses the built-in descriptions.
    #[serde(default)]
    pub persona_file: Option<PathBuf>,

    /// Fill `memory_output.memory_to_store` on every decision.
    #[serde(default = "default_record_memory")]
    pub record_memory: bool,
}

fn default_record_memory() -> bool {
    true
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            learner: LearnerConfig::default(),
            persona_file: None,
            record_memory: default_record_memory(),
        }
    }
}

impl CompanionConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.learner.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Defaults, or the YAML file if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty(ENV_QTABLE_PATH) {
            self.learner.storage_path = Some(PathBuf::from(path));
        }
        if let Some(path) = non_empty(ENV_PERSONA_FILE) {
            self.persona_file = Some(PathBuf::from(path));
        }
        if let Some(raw) = non_empty(ENV_EPSILON) {
            let epsilon: f64 = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_EPSILON} is not a number: {raw:?}"))
            })?;
            self.learner.epsilon = epsilon;
            if self.learner.min_epsilon > epsilon {
                self.learner.min_epsilon = epsilon;
            }
        }

        self.learner.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const SAMPLE: &str = include_str!("../config/companion.yaml");

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let c = CompanionConfig::default();
        assert_eq!(c.learner.alpha, 0.3);
        assert_eq!(c.learner.gamma, 0.85);
        assert_eq!(c.learner.epsilon, 0.3);
        assert_eq!(c.learner.min_epsilon, 0.05);
        assert_eq!(c.learner.epsilon_decay, 0.995);
        assert!(c.record_memory);
        assert!(c.learner.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let c = CompanionConfig::from_yaml("{}").unwrap();
        assert_eq!(c, CompanionConfig::default());
    }

    #[test]
    fn test_sample_file_parses() {
        let c = CompanionConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(c.learner, LearnerConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let c = CompanionConfig::from_yaml("learner:\n  alpha: 0.5\nrecord_memory: false\n").unwrap();
        assert_eq!(c.learner.alpha, 0.5);
        assert_eq!(c.learner.gamma, 0.85);
        assert!(!c.record_memory);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(CompanionConfig::from_yaml("learner:\n  alpha: 0.0\n").is_err());
        assert!(CompanionConfig::from_yaml("learner:\n  gamma: 1.5\n").is_err());
        assert!(CompanionConfig::from_yaml("learner:\n  epsilon: 0.01\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut c = CompanionConfig::default();
        c.apply_overrides_from(lookup(&[
            (ENV_QTABLE_PATH, "/tmp/q.json"),
            (ENV_PERSONA_FILE, "personas.yaml"),
            (ENV_EPSILON, "0.0"),
        ]))
        .unwrap();
        assert_eq!(c.learner.storage_path, Some(PathBuf::from("/tmp/q.json")));
        assert_eq!(c.persona_file, Some(PathBuf::from("personas.yaml")));
        assert_eq!(c.learner.epsilon, 0.0);
        assert_eq!(c.learner.min_epsilon, 0.0);
    }

    #[test]
    fn test_bad_epsilon_override() {
        let mut c = CompanionConfig::default();
        let err = c.apply_overrides_from(lookup(&[(ENV_EPSILON, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "learner:\n  seed: 7\n  storage_path: /data/q.json").unwrap();
        let c = CompanionConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(c.learner.seed, Some(7));
        assert_eq!(c.learner.resolved_storage_path(), PathBuf::from("/data/q.json"));
    }
}
