use crate::error::MlError;
use crate::graph::{sigmoid, EOp, Node};
use crate::recorder::Recorder;
use crate::{Tensor, TensorStore};
use std::collections::HashMap;

/// A tape that records operations for automatic differentiation.
#[derive(Default)]
pub struct Tape {
    nodes: Vec<Node>,
}

impl Recorder for Tape {
    fn record(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

fn slot(grads: &mut HashMap<usize, Vec<f32>>, id: usize, len: usize) -> &mut Vec<f32> {
    grads.entry(id).or_insert_with(|| vec![0.0; len])
}

impl Tape {
    /// Creates a new, empty tape.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Computes the gradients of the tensors on the tape with respect to a loss tensor.
    ///
    /// The gradients are computed by traversing the recorded operations in reverse order.
    /// Only tensors flagged with `requires_grad` receive a `grad`; nodes that do not
    /// contribute to `loss` are skipped.
    pub fn backward(&self, loss: &Tensor, tensors: &mut TensorStore) -> Result<(), MlError> {
        let mut grads: HashMap<usize, Vec<f32>> = HashMap::new();
        grads.insert(loss.id, vec![1.0; loss.data.len()]);

        for node in self.nodes.iter().rev() {
            let Some(out_grad) = grads.get(&node.out).cloned() else {
                continue;
            };
            let a = tensors.get(&node.a).ok_or(MlError::MissingTensor(node.a))?;
            let b = tensors.get(&node.b).ok_or(MlError::MissingTensor(node.b))?;

            match node.op {
                EOp::Add => {
                    for (g, og) in slot(&mut grads, a.id, a.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                    for (g, og) in slot(&mut grads, b.id, b.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                }
                EOp::Sub => {
                    for (g, og) in slot(&mut grads, a.id, a.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                    for (g, og) in slot(&mut grads, b.id, b.len()).iter_mut().zip(&out_grad) {
                        *g -= og;
                    }
                }
                EOp::Mul => {
                    let a_grad = slot(&mut grads, a.id, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(b.data.iter().zip(&out_grad)) {
                        *g += d * og;
                    }
                    let b_grad = slot(&mut grads, b.id, b.len());
                    for (g, (d, og)) in b_grad.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        *g += d * og;
                    }
                }
                EOp::Div => {
                    let a_grad = slot(&mut grads, a.id, a.len());
                    for (g, (y, og)) in a_grad.iter_mut().zip(b.data.iter().zip(&out_grad)) {
                        *g += og / y;
                    }
                    let b_grad = slot(&mut grads, b.id, b.len());
                    for (i, g) in b_grad.iter_mut().enumerate() {
                        *g -= out_grad[i] * a.data[i] / (b.data[i] * b.data[i]);
                    }
                }
                EOp::MatMul => {
                    let out_dim = a.shape[0];
                    let in_dim = a.shape[1];
                    let batch_size = b.shape[0];

                    {
                        let w_grad = slot(&mut grads, a.id, a.len());
                        for i in 0..out_dim {
                            for j in 0..in_dim {
                                for k in 0..batch_size {
                                    w_grad[i * in_dim + j] +=
                                        out_grad[k * out_dim + i] * b.data[k * in_dim + j];
                                }
                            }
                        }
                    }

                    {
                        let x_grad = slot(&mut grads, b.id, b.len());
                        for k in 0..batch_size {
                            for j in 0..in_dim {
                                for i in 0..out_dim {
                                    x_grad[k * in_dim + j] +=
                                        out_grad[k * out_dim + i] * a.data[i * in_dim + j];
                                }
                            }
                        }
                    }
                }
                EOp::AddBroadcast => {
                    for (g, og) in slot(&mut grads, a.id, a.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                    let dim = b.len();
                    let b_grad = slot(&mut grads, b.id, dim);
                    for (i, og) in out_grad.iter().enumerate() {
                        b_grad[i % dim] += og;
                    }
                }
                EOp::AddScalar => {
                    for (g, og) in slot(&mut grads, a.id, a.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                }
                EOp::MulScalar => {
                    let scalar = b.data[0];
                    for (g, og) in slot(&mut grads, a.id, a.len()).iter_mut().zip(&out_grad) {
                        *g += scalar * og;
                    }
                }
                EOp::Relu => {
                    let a_grad = slot(&mut grads, a.id, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        if *d > 0.0 {
                            *g += og;
                        }
                    }
                }
                EOp::Tanh => {
                    let out = tensors.get(&node.out).ok_or(MlError::MissingTensor(node.out))?;
                    let a_grad = slot(&mut grads, a.id, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(out.data.iter().zip(&out_grad)) {
                        *g += (1.0 - d.powi(2)) * og;
                    }
                }
                EOp::Softplus => {
                    let a_grad = slot(&mut grads, a.id, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        *g += sigmoid(*d) * og;
                    }
                }
                EOp::Exp => {
                    let out = tensors.get(&node.out).ok_or(MlError::MissingTensor(node.out))?;
                    let a_grad = slot(&mut grads, a.id, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(out.data.iter().zip(&out_grad)) {
                        *g += d * og;
                    }
                }
                EOp::Log => {
                    let a_grad = slot(&mut grads, a.id, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        *g += og / d;
                    }
                }
                EOp::Square => {
                    let a_grad = slot(&mut grads, a.id, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        *g += 2.0 * d * og;
                    }
                }
                EOp::Clamp => {
                    let (min, max) = (b.data[0], b.data[1]);
                    let a_grad = slot(&mut grads, a.id, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        if *d > min && *d < max {
                            *g += og;
                        }
                    }
                }
                EOp::ReduceSum => {
                    for g in slot(&mut grads, a.id, a.len()).iter_mut() {
                        *g += out_grad[0];
                    }
                }
                EOp::ReduceMean => {
                    let n = a.len().max(1) as f32;
                    for g in slot(&mut grads, a.id, a.len()).iter_mut() {
                        *g += out_grad[0] / n;
                    }
                }
            }
        }

        for (id, grad) in grads {
            if let Some(tensor) = tensors.get_mut(&id) {
                if tensor.requires_grad {
                    tensor.grad = Some(grad);
                }
            }
        }

        Ok(())
    }
}

/// Copies the gradients computed into the store back onto the owning parameters.
pub fn pull_grads(params: &mut [&mut Tensor], tensors: &TensorStore) {
    for p in params.iter_mut() {
        p.grad = tensors.get(&p.id).and_then(|t| t.grad.clone());
    }
}
