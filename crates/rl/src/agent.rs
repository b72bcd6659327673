use crate::config::AgentConfig;
use crate::env::Env;
use crate::error::AgentError;
use crate::memory::Memory;
use crate::policy::GaussianPolicy;
use ml::tape::{pull_grads, Tape};
use ml::{Adam, TensorStore};
use std::fmt;
use tracing::{debug, info};

/// Result of one environment step taken by an agent.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub reward: f32,
    pub done: bool,
    /// Set when the step closed a batch and triggered a training step.
    pub trained: Option<TrainStats>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrainStats {
    pub loss: f32,
    pub samples: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeStats {
    /// Completed episodes including this one.
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f32,
    pub trained: Option<TrainStats>,
}

/// True when the episode with zero-based `index` should be rendered.
pub fn render_due(index: usize, render_every: Option<usize>) -> bool {
    render_every.is_some_and(|n| n > 0 && index % n == 0)
}

/// Lifecycle hooks shared by agents that drive an [`Env`].
pub trait Agent {
    /// Resets the environment and the current state, dropping any
    /// transitions of an unfinished episode.
    fn reset(&mut self);

    fn get_action(&mut self, state: &[f32]) -> Result<Vec<f32>, AgentError>;

    fn add(&mut self, state: Vec<f32>, action: Vec<f32>, reward: f32);

    fn step(&mut self, render: bool) -> Result<StepOutcome, AgentError>;

    fn train(&mut self) -> Result<TrainStats, AgentError>;

    /// Number of completed episodes.
    fn episode(&self) -> usize;

    fn save(&self) -> Result<(), AgentError> {
        Ok(())
    }

    fn load(&mut self) -> Result<(), AgentError> {
        Ok(())
    }

    /// Plays one episode from a fresh reset until the environment reports done.
    fn run_episode(&mut self, render: bool) -> Result<EpisodeStats, AgentError> {
        self.reset();
        let mut steps = 0;
        let mut total_reward = 0.0;
        let mut trained = None;
        loop {
            let outcome = self.step(render)?;
            steps += 1;
            total_reward += outcome.reward;
            if outcome.trained.is_some() {
                trained = outcome.trained;
            }
            if outcome.done {
                break;
            }
        }
        Ok(EpisodeStats {
            episode: self.episode(),
            steps,
            total_reward,
            trained,
        })
    }

    /// Plays `episodes` episodes, rendering every `render_every`-th one.
    fn run(
        &mut self,
        episodes: usize,
        render_every: Option<usize>,
    ) -> Result<Vec<EpisodeStats>, AgentError> {
        let mut history = Vec::with_capacity(episodes);
        for i in 0..episodes {
            let stats = self.run_episode(render_due(i, render_every))?;
            debug!(
                episode = stats.episode,
                steps = stats.steps,
                reward = stats.total_reward,
                "episode finished"
            );
            history.push(stats);
        }
        Ok(history)
    }
}

/// Policy gradient agent for continuous actions.
///
/// Transitions are buffered until `batch_size` episodes have completed;
/// the discounted, normalised returns then weight the log-likelihood of the
/// taken actions in a single Adam step.
pub struct PgContinuous<E: Env> {
    env: E,
    config: AgentConfig,
    policy: GaussianPolicy,
    optimizer: Adam,
    memory: Memory,
    rng: fastrand::Rng,
    current_state: Vec<f32>,
    episode: usize,
    total_steps: usize,
}

impl<E: Env> PgContinuous<E> {
    pub fn new(config: AgentConfig, mut env: E) -> Result<Self, AgentError> {
        config.validate()?;
        if env.obs_size() != config.state_size {
            return Err(AgentError::EnvMismatch {
                what: "observation size",
                expected: config.state_size,
                found: env.obs_size(),
            });
        }
        if env.action_size() != config.num_actions {
            return Err(AgentError::EnvMismatch {
                what: "action size",
                expected: config.num_actions,
                found: env.action_size(),
            });
        }

        let mut rng = fastrand::Rng::with_seed(config.seed);
        let policy = GaussianPolicy::new(&config, &mut rng);
        let optimizer = Adam::new(config.learning_rate, &policy.params());
        let current_state = env.reset();
        info!(
            state_size = config.state_size,
            num_actions = config.num_actions,
            batch_size = config.batch_size,
            learning_rate = config.learning_rate,
            "created pg-continuous agent"
        );
        Ok(Self {
            env,
            config,
            policy,
            optimizer,
            memory: Memory::new(),
            rng,
            current_state,
            episode: 0,
            total_steps: 0,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn policy(&self) -> &GaussianPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut GaussianPolicy {
        &mut self.policy
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn current_state(&self) -> &[f32] {
        &self.current_state
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Number of optimiser updates applied so far.
    pub fn updates(&self) -> u32 {
        self.optimizer.steps()
    }

    /// True when the completed episode count is a positive multiple of `batch_size`.
    pub fn batch_ready(&self) -> bool {
        self.episode > 0 && self.episode % self.config.batch_size == 0
    }
}

impl<E: Env> Agent for PgContinuous<E> {
    fn reset(&mut self) {
        self.memory.discard_episode();
        self.current_state = self.env.reset();
    }

    fn get_action(&mut self, state: &[f32]) -> Result<Vec<f32>, AgentError> {
        self.policy.act(state, &mut self.rng)
    }

    fn add(&mut self, state: Vec<f32>, action: Vec<f32>, reward: f32) {
        self.memory.add(state, action, reward);
    }

    fn step(&mut self, render: bool) -> Result<StepOutcome, AgentError> {
        if render {
            self.env.render();
        }

        let action = self.policy.act(&self.current_state, &mut self.rng)?;
        let result = self.env.step(&action);
        self.total_steps += 1;

        let state = std::mem::replace(&mut self.current_state, result.observation);
        self.add(state, action, result.reward);

        let mut trained = None;
        if result.done {
            self.memory.finish_episode(self.config.gamma);
            self.episode += 1;
            if self.batch_ready() {
                trained = Some(self.train()?);
            }
        }

        Ok(StepOutcome {
            reward: result.reward,
            done: result.done,
            trained,
        })
    }

    fn train(&mut self) -> Result<TrainStats, AgentError> {
        let batch = self.memory.batch()?;
        let mut tape = Tape::new();
        let mut tensors = TensorStore::new();
        let loss = self.policy.loss(&batch, &mut tape, &mut tensors)?;
        tape.backward(&loss, &mut tensors)?;

        let mut params = self.policy.params_mut();
        pull_grads(&mut params, &tensors);
        self.optimizer.step(&mut params)?;
        self.memory.clear();

        let stats = TrainStats {
            loss: loss.data[0],
            samples: batch.len(),
        };
        info!(
            episode = self.episode,
            update = self.optimizer.steps(),
            samples = stats.samples,
            loss = stats.loss,
            "policy updated"
        );
        Ok(stats)
    }

    fn episode(&self) -> usize {
        self.episode
    }

    fn save(&self) -> Result<(), AgentError> {
        debug!("save is a no-op for {self}");
        Ok(())
    }

    fn load(&mut self) -> Result<(), AgentError> {
        debug!("load is a no-op for {self}");
        Ok(())
    }
}

impl<E: Env> fmt::Display for PgContinuous<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("pg-continuous")
    }
}
