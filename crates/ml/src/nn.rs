use crate::recorder::Recorder;
use crate::tensor::Tensor;
use crate::TensorStore;

/// A fully connected neural network layer.
#[derive(Clone, Debug)]
pub struct Dense {
    /// The weight matrix for the layer, `[out_dim, in_dim]`.
    pub w: Tensor,
    /// The bias vector for the layer.
    pub b: Tensor,
    /// The number of input dimensions.
    pub in_dim: usize,
    /// The number of output dimensions.
    pub out_dim: usize,
}

impl Dense {
    /// Creates a new `Dense` layer with the given weights and biases.
    /// Both parameters are marked as requiring gradients.
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_d: usize, out_d: usize) -> Self {
        assert_eq!(weights.len(), in_d * out_d);
        assert_eq!(bias.len(), out_d);
        Self {
            w: Tensor::from_vec(vec![out_d, in_d], weights).with_grad(),
            b: Tensor::from_vec(vec![out_d], bias).with_grad(),
            in_dim: in_d,
            out_dim: out_d,
        }
    }

    pub fn random(in_d: usize, out_d: usize, rng: &mut fastrand::Rng) -> Self {
        // Glorot initialization
        let limit = (6.0 / (in_d + out_d) as f32).sqrt();
        let weights = (0..in_d * out_d)
            .map(|_| rng.f32() * 2.0 * limit - limit)
            .collect();
        let bias = vec![0.0; out_d];
        Self::new(weights, bias, in_d, out_d)
    }

    /// Performs the forward pass through the layer: `x[batch, in] -> [batch, out]`.
    pub fn forward(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Tensor {
        let wx = self.w.matmul(x, recorder, tensors);
        wx.add_broadcast(&self.b, recorder, tensors)
    }

    pub fn params(&self) -> Vec<&Tensor> {
        vec![&self.w, &self.b]
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.w, &mut self.b]
    }
}
