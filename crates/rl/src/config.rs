use crate::error::AgentError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hyper-parameters and shapes for [`crate::PgContinuous`].
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    pub learning_rate: f32,
    pub gamma: f32,
    /// Episodes collected per training step.
    pub batch_size: usize,
    pub state_size: usize,
    pub num_actions: usize,
    pub hidden_units: usize,
    /// Weight of the entropy bonus in the objective.
    pub entropy_beta: f32,
    /// Actions are clipped to `[-action_bound, action_bound]`; the mean head is scaled by it.
    pub action_bound: f32,
    /// Added to the softplus output so sigma never reaches zero.
    pub sigma_floor: f32,
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            gamma: 0.99,
            batch_size: 10,
            state_size: 3,
            num_actions: 1,
            hidden_units: 36,
            entropy_beta: 0.01,
            action_bound: 2.0,
            sigma_floor: 0.1,
            seed: 0,
        }
    }
}

impl AgentConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AgentError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), AgentError> {
        let invalid = |msg: String| Err(AgentError::InvalidConfig(msg));
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return invalid(format!("learning_rate must be positive, got {}", self.learning_rate));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return invalid(format!("gamma must lie in [0, 1], got {}", self.gamma));
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be at least 1".into());
        }
        if self.state_size == 0 || self.num_actions == 0 || self.hidden_units == 0 {
            return invalid("state_size, num_actions and hidden_units must be non-zero".into());
        }
        if !(self.action_bound > 0.0 && self.action_bound.is_finite()) {
            return invalid(format!(
                "action_bound must be finite and positive, got {}",
                self.action_bound
            ));
        }
        if !(self.sigma_floor > 0.0 && self.sigma_floor.is_finite()) {
            return invalid(format!(
                "sigma_floor must be finite and positive, got {}",
                self.sigma_floor
            ));
        }
        if !(self.entropy_beta >= 0.0 && self.entropy_beta.is_finite()) {
            return invalid(format!(
                "entropy_beta must be finite and non-negative, got {}",
                self.entropy_beta
            ));
        }
        Ok(())
    }
}
