use crate::env::{Env, StepResult};
use std::collections::HashMap;
use std::f32::consts::PI;

const MAX_SPEED: f32 = 8.0;
const MAX_TORQUE: f32 = 2.0;
const DT: f32 = 0.05;
const G: f32 = 10.0;
const MASS: f32 = 1.0;
const LENGTH: f32 = 1.0;

/// Inverted pendulum swing-up.
///
/// The pole starts at a random angle and the agent applies a torque in
/// `[-2, 2]` to swing it upright and keep it there. Observations are
/// `[cos theta, sin theta, theta_dot]`; the reward is the negated cost
/// `theta^2 + 0.1 theta_dot^2 + 0.001 u^2` with theta normalised to `[-pi, pi)`.
/// Episodes end after `max_steps` steps.
pub struct Pendulum {
    theta: f32,
    theta_dot: f32,
    last_torque: f32,
    steps: usize,
    max_steps: usize,
    rng: fastrand::Rng,
}

impl Pendulum {
    pub fn new(seed: u64) -> Self {
        Self::with_max_steps(seed, 200)
    }

    pub fn with_max_steps(seed: u64, max_steps: usize) -> Self {
        let mut env = Self {
            theta: 0.0,
            theta_dot: 0.0,
            last_torque: 0.0,
            steps: 0,
            max_steps: max_steps.max(1),
            rng: fastrand::Rng::with_seed(seed),
        };
        env.reset();
        env
    }

    /// Resets to an explicit state instead of a random one.
    pub fn reset_to(&mut self, theta: f32, theta_dot: f32) -> Vec<f32> {
        self.theta = theta;
        self.theta_dot = theta_dot;
        self.last_torque = 0.0;
        self.steps = 0;
        self.observation()
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn theta_dot(&self) -> f32 {
        self.theta_dot
    }

    fn observation(&self) -> Vec<f32> {
        vec![self.theta.cos(), self.theta.sin(), self.theta_dot]
    }
}

/// Wraps an angle into `[-pi, pi)`.
pub fn angle_normalize(x: f32) -> f32 {
    (x + PI).rem_euclid(2.0 * PI) - PI
}

impl Env for Pendulum {
    fn reset(&mut self) -> Vec<f32> {
        let theta = self.rng.f32() * 2.0 * PI - PI;
        let theta_dot = self.rng.f32() * 2.0 - 1.0;
        self.reset_to(theta, theta_dot)
    }

    fn step(&mut self, action: &[f32]) -> StepResult {
        let u = action.first().copied().unwrap_or(0.0).clamp(-MAX_TORQUE, MAX_TORQUE);
        self.last_torque = u;

        let th = self.theta;
        let thdot = self.theta_dot;
        let cost = angle_normalize(th).powi(2) + 0.1 * thdot.powi(2) + 0.001 * u.powi(2);

        let new_thdot = thdot
            + (-3.0 * G / (2.0 * LENGTH) * (th + PI).sin() + 3.0 / (MASS * LENGTH * LENGTH) * u) * DT;
        let new_thdot = new_thdot.clamp(-MAX_SPEED, MAX_SPEED);
        self.theta = th + new_thdot * DT;
        self.theta_dot = new_thdot;
        self.steps += 1;

        let mut info = HashMap::new();
        info.insert("cost".to_string(), cost);
        StepResult {
            observation: self.observation(),
            reward: -cost,
            done: self.steps >= self.max_steps,
            info,
        }
    }

    fn render(&mut self) {
        tracing::info!(
            step = self.steps,
            theta = angle_normalize(self.theta),
            theta_dot = self.theta_dot,
            torque = self.last_torque,
            "pendulum"
        );
    }

    fn obs_size(&self) -> usize {
        3
    }

    fn action_size(&self) -> usize {
        1
    }
}
