use crate::Args;
use anyhow::{Context, Result};
use rl::{render_due, Agent, AgentConfig, Pendulum, PgContinuous};

/// Builds the config from file and flags, then runs the training loop.
pub fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    tracing::info!(?config, "starting training");

    let env = Pendulum::with_max_steps(config.seed, args.max_steps);
    let mut agent = PgContinuous::new(config, env).context("failed to build agent")?;
    agent.load()?;

    let mut best = f32::NEG_INFINITY;
    for i in 0..args.episodes {
        let stats = agent.run_episode(render_due(i, args.render_every))?;
        best = best.max(stats.total_reward);
        if stats.trained.is_some() || i + 1 == args.episodes {
            tracing::info!(
                episode = stats.episode,
                reward = stats.total_reward,
                best,
                "episode"
            );
        }
    }

    agent.save()?;
    tracing::info!(
        episodes = agent.episode(),
        steps = agent.total_steps(),
        updates = agent.updates(),
        best,
        "training finished"
    );
    Ok(())
}

fn load_config(args: &Args) -> Result<AgentConfig> {
    let mut config = match &args.config {
        Some(path) => AgentConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AgentConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(lr) = args.learning_rate {
        config.learning_rate = lr;
    }
    if let Some(gamma) = args.gamma {
        config.gamma = gamma;
    }
    config.validate()?;
    Ok(config)
}
