use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rl::{Agent, AgentConfig, Pendulum, PgContinuous};

fn bench_episode_with_update(c: &mut Criterion) {
    let config = AgentConfig {
        batch_size: 1,
        ..AgentConfig::default()
    };
    let mut agent = PgContinuous::new(config.clone(), Pendulum::with_max_steps(0, 200))
        .expect("default config is valid");
    c.bench_function("pg_episode_200_steps_with_update", |b| {
        b.iter(|| black_box(agent.run_episode(false).expect("episode failed")));
    });

    let mut agent = PgContinuous::new(config, Pendulum::with_max_steps(0, 200))
        .expect("default config is valid");
    let state = agent.current_state().to_vec();
    c.bench_function("pg_get_action", |b| {
        b.iter(|| black_box(agent.get_action(black_box(&state)).expect("action failed")));
    });
}

criterion_group!(benches, bench_episode_with_update);
criterion_main!(benches);
