//! # pg_pendulum
//!
//! Trains the continuous-action policy gradient agent on the pendulum
//! swing-up task and logs per-episode returns.
//!
//! Hyper-parameters come from an optional JSON config file (see
//! [`rl::AgentConfig`]); command-line flags override individual values.

mod app;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pg_pendulum", about = "Policy gradient on the pendulum task")]
pub struct Args {
    /// JSON file with agent hyper-parameters.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Number of episodes to play.
    #[arg(long, default_value_t = 500)]
    pub episodes: usize,
    /// Render every n-th episode.
    #[arg(long)]
    pub render_every: Option<usize>,
    /// Steps per episode.
    #[arg(long, default_value_t = 200)]
    pub max_steps: usize,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub batch_size: Option<usize>,
    #[arg(long)]
    pub learning_rate: Option<f32>,
    #[arg(long)]
    pub gamma: Option<f32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    app::run(&args)
}
