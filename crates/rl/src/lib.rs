//! # rl
//!
//! A REINFORCE-style agent for continuous action spaces. The policy is a
//! small feed-forward network producing a Gaussian over actions; episodes are
//! collected into a batch, discounted, normalised and used for one Adam step
//! every `batch_size` episodes.

pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod memory;
pub mod pendulum;
pub mod policy;

pub use agent::{render_due, Agent, EpisodeStats, PgContinuous, StepOutcome, TrainStats};
pub use config::AgentConfig;
pub use env::{Env, StepResult};
pub use error::AgentError;
pub use memory::{discount_rewards, normalize, Batch, Memory};
pub use pendulum::Pendulum;
pub use policy::GaussianPolicy;
