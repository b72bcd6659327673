use std::collections::HashMap;

/// Outcome of a single [`Env::step`].
#[derive(Clone, Debug, Default)]
pub struct StepResult {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub done: bool,
    /// Free-form diagnostics; the agent never reads it.
    pub info: HashMap<String, f32>,
}

/// Reinforcement learning environment trait.
///
/// Inspired by classic frameworks like OpenAI Gym, this trait defines the core
/// interface an environment must provide. Each call to [`step`] advances the
/// simulation by one action and returns the new observation vector, a reward
/// signal, and whether the episode has terminated.
///
/// [`step`]: Env::step
pub trait Env {
    /// Reset the environment to its starting state and return the initial
    /// observation vector.
    fn reset(&mut self) -> Vec<f32>;

    /// Advance the environment by one action.
    fn step(&mut self, action: &[f32]) -> StepResult;

    /// Present the current state. The default does nothing.
    fn render(&mut self) {}

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Size of the action vector.
    fn action_size(&self) -> usize;
}
