use crate::error::MlError;
use crate::Tensor;

/// Adam with bias-corrected step size.
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: u32,
    m: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

impl Adam {
    pub fn new(lr: f32, params: &[&Tensor]) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: params.iter().map(|p| vec![0.0; p.data.len()]).collect(),
            v: params.iter().map(|p| vec![0.0; p.data.len()]).collect(),
        }
    }

    pub fn learning_rate(&self) -> f32 {
        self.lr
    }

    /// Number of updates applied so far.
    pub fn steps(&self) -> u32 {
        self.t
    }

    /// Applies one update to `params`, which must be passed in the same order
    /// as at construction and carry a `grad`.
    pub fn step(&mut self, params: &mut [&mut Tensor]) -> Result<(), MlError> {
        if params.len() != self.m.len() {
            return Err(MlError::ParamCountMismatch {
                expected: self.m.len(),
                found: params.len(),
            });
        }
        if let Some(p) = params.iter().find(|p| p.grad.is_none()) {
            return Err(MlError::MissingGradient(p.id));
        }

        self.t += 1;
        let t = self.t as i32;
        let lr_t = self.lr * (1.0 - self.beta2.powi(t)).sqrt() / (1.0 - self.beta1.powi(t));

        for ((p, m), v) in params.iter_mut().zip(&mut self.m).zip(&mut self.v) {
            let Tensor { data, grad, .. } = &mut **p;
            let Some(grad) = grad else { continue };
            for j in 0..data.len() {
                m[j] = self.beta1 * m[j] + (1.0 - self.beta1) * grad[j];
                v[j] = self.beta2 * v[j] + (1.0 - self.beta2) * grad[j].powi(2);
                data[j] -= lr_t * m[j] / (v[j].sqrt() + self.eps);
            }
        }
        Ok(())
    }
}
