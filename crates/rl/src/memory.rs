use crate::error::AgentError;

/// Guard added to the standard deviation when normalising returns.
pub const NORMALIZE_EPS: f32 = 1e-10;

/// Discounted returns, `ret[t] = r[t] + gamma * ret[t + 1]`.
pub fn discount_rewards(rewards: &[f32], gamma: f32) -> Vec<f32> {
    let mut discounted = vec![0.0; rewards.len()];
    let mut running = 0.0;
    for t in (0..rewards.len()).rev() {
        running = running * gamma + rewards[t];
        discounted[t] = running;
    }
    discounted
}

/// `(x - mean) / (std + eps)` with the population standard deviation.
/// A constant input maps to zeros.
pub fn normalize(values: &[f32]) -> Vec<f32> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n).sqrt();
    values.iter().map(|v| (v - mean) / (std + NORMALIZE_EPS)).collect()
}

/// Flattened training data for one optimiser step.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    pub observations: Vec<Vec<f32>>,
    pub actions: Vec<Vec<f32>>,
    /// Normalised discounted returns, one per transition.
    pub advantages: Vec<f32>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Trajectory storage for the current batch of episodes.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    observations: Vec<Vec<f32>>,
    actions: Vec<Vec<f32>>,
    episode_rewards: Vec<f32>,
    returns: Vec<f32>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, state: Vec<f32>, action: Vec<f32>, reward: f32) {
        self.observations.push(state);
        self.actions.push(action);
        self.episode_rewards.push(reward);
    }

    /// Discounts the rewards of the episode that just ended and appends them
    /// to the batch returns.
    pub fn finish_episode(&mut self, gamma: f32) {
        let discounted = discount_rewards(&self.episode_rewards, gamma);
        self.returns.extend(discounted);
        self.episode_rewards.clear();
    }

    /// Drops the transitions of an episode that was abandoned before it ended.
    pub fn discard_episode(&mut self) {
        let keep = self.observations.len() - self.episode_rewards.len();
        self.observations.truncate(keep);
        self.actions.truncate(keep);
        self.episode_rewards.clear();
    }

    /// Builds a training batch with normalised returns.
    pub fn batch(&self) -> Result<Batch, AgentError> {
        let (observations, actions, returns) =
            (self.observations.len(), self.actions.len(), self.returns.len());
        if observations != actions || observations != returns {
            return Err(AgentError::BatchMismatch {
                observations,
                actions,
                returns,
            });
        }
        if observations == 0 {
            return Err(AgentError::EmptyBatch);
        }
        Ok(Batch {
            observations: self.observations.clone(),
            actions: self.actions.clone(),
            advantages: normalize(&self.returns),
        })
    }

    pub fn clear(&mut self) {
        self.observations.clear();
        self.actions.clear();
        self.episode_rewards.clear();
        self.returns.clear();
    }

    /// Transitions stored since the last clear.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
            && self.actions.is_empty()
            && self.episode_rewards.is_empty()
            && self.returns.is_empty()
    }

    pub fn observations(&self) -> &[Vec<f32>] {
        &self.observations
    }

    pub fn actions(&self) -> &[Vec<f32>] {
        &self.actions
    }

    pub fn episode_rewards(&self) -> &[f32] {
        &self.episode_rewards
    }

    pub fn returns(&self) -> &[f32] {
        &self.returns
    }
}
