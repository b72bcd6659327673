use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::memory::Batch;
use ml::recorder::Recorder;
use ml::{Dense, Graph, Normal, Tensor, TensorStore};

/// Feed-forward Gaussian policy.
///
/// `state -> relu(Dense) -> relu(Dense)`, then two heads:
/// `sigma = softplus(Dense) + sigma_floor` and `mu = tanh(Dense) * action_bound`.
pub struct GaussianPolicy {
    pub hidden1: Dense,
    pub hidden2: Dense,
    pub sigma_head: Dense,
    pub mu_head: Dense,
    state_size: usize,
    num_actions: usize,
    action_bound: f32,
    sigma_floor: f32,
    entropy_beta: f32,
}

impl GaussianPolicy {
    pub fn new(config: &AgentConfig, rng: &mut fastrand::Rng) -> Self {
        let h = config.hidden_units;
        Self {
            hidden1: Dense::random(config.state_size, h, rng),
            hidden2: Dense::random(h, h, rng),
            sigma_head: Dense::random(h, config.num_actions, rng),
            mu_head: Dense::random(h, config.num_actions, rng),
            state_size: config.state_size,
            num_actions: config.num_actions,
            action_bound: config.action_bound,
            sigma_floor: config.sigma_floor,
            entropy_beta: config.entropy_beta,
        }
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn action_bound(&self) -> f32 {
        self.action_bound
    }

    /// Action distribution for a `[batch, state_size]` tensor of states.
    pub fn distribution(
        &self,
        states: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Normal {
        let x = self.hidden1.forward(states, recorder, tensors).relu(recorder, tensors);
        let x = self.hidden2.forward(&x, recorder, tensors).relu(recorder, tensors);
        let sigma = self
            .sigma_head
            .forward(&x, recorder, tensors)
            .softplus(recorder, tensors)
            .add_scalar(self.sigma_floor, recorder, tensors);
        let mu = self
            .mu_head
            .forward(&x, recorder, tensors)
            .tanh(recorder, tensors)
            .mul_scalar(self.action_bound, recorder, tensors);
        Normal::new(mu, sigma)
    }

    /// Samples an action for one state, clipped to `[-action_bound, action_bound]`.
    /// Non-finite samples (from diverged parameters) become `0.0`.
    pub fn act(&self, state: &[f32], rng: &mut fastrand::Rng) -> Result<Vec<f32>, AgentError> {
        if state.len() != self.state_size {
            return Err(AgentError::StateSize {
                expected: self.state_size,
                found: state.len(),
            });
        }
        let states = Tensor::from_vec(vec![1, self.state_size], state.to_vec());
        let mut tensors = TensorStore::new();
        let dist = self.distribution(&states, &mut Graph::new(), &mut tensors);
        let bound = self.action_bound;
        Ok(dist
            .sample(rng)
            .into_iter()
            .map(|a| if a.is_finite() { a.clamp(-bound, bound) } else { 0.0 })
            .collect())
    }

    /// Records `-mean(log_prob(a) * advantage + entropy_beta * entropy)` for the batch.
    pub fn loss(
        &self,
        batch: &Batch,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Result<Tensor, AgentError> {
        let n = batch.len();
        if n == 0 {
            return Err(AgentError::EmptyBatch);
        }
        if let Some(bad) = batch.observations.iter().find(|s| s.len() != self.state_size) {
            return Err(AgentError::StateSize {
                expected: self.state_size,
                found: bad.len(),
            });
        }
        if let Some(bad) = batch.actions.iter().find(|a| a.len() != self.num_actions) {
            return Err(AgentError::EnvMismatch {
                what: "action size",
                expected: self.num_actions,
                found: bad.len(),
            });
        }

        let states = Tensor::from_vec(
            vec![n, self.state_size],
            batch.observations.iter().flatten().copied().collect(),
        );
        let actions = Tensor::from_vec(
            vec![n, self.num_actions],
            batch.actions.iter().flatten().copied().collect(),
        );
        let advantages = Tensor::from_vec(
            vec![n, self.num_actions],
            batch
                .advantages
                .iter()
                .flat_map(|&a| std::iter::repeat(a).take(self.num_actions))
                .collect(),
        );

        let dist = self.distribution(&states, recorder, tensors);
        let weighted = dist
            .log_prob(&actions, recorder, tensors)
            .mul(&advantages, recorder, tensors);
        let bonus = dist
            .entropy(recorder, tensors)
            .mul_scalar(self.entropy_beta, recorder, tensors);
        Ok(weighted
            .add(&bonus, recorder, tensors)
            .reduce_mean(recorder, tensors)
            .mul_scalar(-1.0, recorder, tensors))
    }

    /// Parameters in a fixed order: hidden1, hidden2, sigma head, mu head (weights then bias).
    pub fn params(&self) -> Vec<&Tensor> {
        let mut out = self.hidden1.params();
        out.extend(self.hidden2.params());
        out.extend(self.sigma_head.params());
        out.extend(self.mu_head.params());
        out
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        let mut out = self.hidden1.params_mut();
        out.extend(self.hidden2.params_mut());
        out.extend(self.sigma_head.params_mut());
        out.extend(self.mu_head.params_mut());
        out
    }
}
