use crate::recorder::Recorder;
use crate::tensor::Tensor;
use crate::TensorStore;
use std::f32::consts::PI;

/// Diagonal Gaussian over tensors of identical shape.
#[derive(Clone, Debug)]
pub struct Normal {
    pub mu: Tensor,
    pub sigma: Tensor,
}

impl Normal {
    pub fn new(mu: Tensor, sigma: Tensor) -> Self {
        assert_eq!(mu.shape, sigma.shape, "mu and sigma must share a shape");
        Self { mu, sigma }
    }

    /// Element-wise `ln N(x | mu, sigma)`.
    pub fn log_prob(&self, x: &Tensor, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        let z = x.sub(&self.mu, r, t).div(&self.sigma, r, t);
        let quad = z.square(r, t).mul_scalar(-0.5, r, t);
        let log_sigma = self.sigma.log(r, t);
        quad.sub(&log_sigma, r, t)
            .add_scalar(-0.5 * (2.0 * PI).ln(), r, t)
    }

    /// Element-wise differential entropy `0.5 + 0.5 ln(2 pi) + ln sigma`.
    pub fn entropy(&self, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.sigma
            .log(r, t)
            .add_scalar(0.5 + 0.5 * (2.0 * PI).ln(), r, t)
    }

    /// Draws one sample per element. Not recorded.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Vec<f32> {
        self.mu
            .data
            .iter()
            .zip(&self.sigma.data)
            .map(|(&mu, &sigma)| mu + sigma * standard_normal(rng))
            .collect()
    }
}

/// Box-Muller draw from `N(0, 1)`.
pub fn standard_normal(rng: &mut fastrand::Rng) -> f32 {
    // 1 - U keeps the argument of ln in (0, 1].
    let u1 = 1.0 - rng.f32();
    let u2 = rng.f32();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
