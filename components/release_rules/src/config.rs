use crate::registry;
use release_model::RuleMetadata;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown rule id: {id}")]
    UnknownRule { id: String },

    #[error("Invalid weight {weight} for rule {id}: weights must be positive")]
    InvalidWeight { id: String, weight: f64 },
}

/// Per-run adjustments to the rule set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Rule id to score weight
    pub weights: BTreeMap<String, f64>,
    /// Rule ids that are not run
    pub disabled: BTreeSet<String>,
}

impl RunnerConfig {
    pub fn new(weights: BTreeMap<String, f64>, disabled: BTreeSet<String>) -> Self {
        Self { weights, disabled }
    }

    pub fn with_weight(mut self, id: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(id.into(), weight);
        self
    }

    pub fn with_disabled(mut self, id: impl Into<String>) -> Self {
        self.disabled.insert(id.into());
        self
    }

    /// Every id must name a registered rule and every weight must be a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for id in self.weights.keys().chain(self.disabled.iter()) {
            if registry::find(id).is_none() {
                return Err(ConfigError::UnknownRule { id: id.clone() });
            }
        }
        for (id, &weight) in &self.weights {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ConfigError::InvalidWeight {
                    id: id.clone(),
                    weight,
                });
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        !self.disabled.contains(id)
    }

    pub fn weight_for(&self, metadata: &RuleMetadata) -> f64 {
        self.weights
            .get(metadata.id)
            .copied()
            .unwrap_or(metadata.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use release_model::Level;

    #[test]
    fn default_config_keeps_declared_weights() {
        let config = RunnerConfig::default();
        let metadata = RuleMetadata::new("2.3.12", "PathLength", Level::Error).with_weight(2.0);
        assert_eq!(config.weight_for(&metadata), 2.0);
        assert!(config.is_enabled("2.3.12"));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn overrides_apply() {
        let config = RunnerConfig::default()
            .with_weight("2.3.12", 0.5)
            .with_disabled("2.3.7");
        let metadata = RuleMetadata::new("2.3.12", "PathLength", Level::Error);
        assert_eq!(config.weight_for(&metadata), 0.5);
        assert!(!config.is_enabled("2.3.7"));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let config = RunnerConfig::default().with_disabled("9.9.9");
        assert_matches!(config.validate(), Err(ConfigError::UnknownRule { id }) if id == "9.9.9");
    }

    #[test]
    fn non_positive_weights_are_rejected() {
        let config = RunnerConfig::default().with_weight("2.3.12", 0.0);
        assert_matches!(config.validate(), Err(ConfigError::InvalidWeight { .. }));

        let config = RunnerConfig::default().with_weight("2.3.12", f64::NAN);
        assert_matches!(config.validate(), Err(ConfigError::InvalidWeight { .. }));
    }

    #[test]
    fn deserializes_from_json() {
        let config: RunnerConfig =
            serde_json::from_str(r#"{"weights": {"2.3.6": 3.0}}"#).unwrap();
        assert_eq!(config.weights.get("2.3.6"), Some(&3.0));
        assert!(config.disabled.is_empty());
    }
}
