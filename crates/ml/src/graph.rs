use crate::error::MlError;
use crate::recorder::Recorder;
use crate::tensor::Tensor;
use crate::TensorStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EOp {
    Add,
    Sub,
    Mul,
    Div,
    MatMul,
    AddBroadcast,
    AddScalar,
    MulScalar,
    Relu,
    Tanh,
    Softplus,
    Exp,
    Log,
    Square,
    Clamp,
    ReduceSum,
    ReduceMean,
}

/// One recorded operation. Unary ops keep their parameter tensor (scalar,
/// clamp bounds) in `b`, or repeat `a` when they have none.
#[derive(Clone, Debug)]
pub struct Node {
    pub op: EOp,
    pub a: usize,
    pub b: usize,
    pub out: usize,
}

/// Forward-only recorder. The nodes can be replayed with [`Graph::run`].
#[derive(Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Recorder for Graph {
    fn record(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes every recorded output from the current contents of the store.
    pub fn run(&self, tensors: &mut TensorStore) -> Result<(), MlError> {
        for node in &self.nodes {
            let (data, _) = {
                let a = tensors.get(&node.a).ok_or(MlError::MissingTensor(node.a))?;
                let b = tensors.get(&node.b).ok_or(MlError::MissingTensor(node.b))?;
                eval(node.op, a, b)
            };
            tensors
                .get_mut(&node.out)
                .ok_or(MlError::MissingTensor(node.out))?
                .data = data;
        }
        Ok(())
    }
}

fn zip_with(a: &Tensor, b: &Tensor, f: impl Fn(f32, f32) -> f32) -> Vec<f32> {
    assert_eq!(a.shape, b.shape, "element-wise op on mismatched shapes");
    a.data.iter().zip(&b.data).map(|(&x, &y)| f(x, y)).collect()
}

fn map(a: &Tensor, f: impl Fn(f32) -> f32) -> Vec<f32> {
    a.data.iter().map(|&x| f(x)).collect()
}

pub(crate) fn softplus(x: f32) -> f32 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// CPU kernel for a single op. Returns the output data and shape.
pub fn eval(op: EOp, a: &Tensor, b: &Tensor) -> (Vec<f32>, Vec<usize>) {
    match op {
        EOp::Add => (zip_with(a, b, |x, y| x + y), a.shape.clone()),
        EOp::Sub => (zip_with(a, b, |x, y| x - y), a.shape.clone()),
        EOp::Mul => (zip_with(a, b, |x, y| x * y), a.shape.clone()),
        EOp::Div => (zip_with(a, b, |x, y| x / y), a.shape.clone()),
        EOp::MatMul => {
            // a: [out, in], b: [batch, in] -> [batch, out]
            assert_eq!(a.shape.len(), 2, "matmul weight must be 2-D");
            assert_eq!(b.shape.len(), 2, "matmul input must be 2-D");
            let (out_dim, in_dim) = (a.shape[0], a.shape[1]);
            let batch = b.shape[0];
            assert_eq!(b.shape[1], in_dim, "matmul inner dimensions differ");
            let mut y = vec![0.0; batch * out_dim];
            for k in 0..batch {
                let x = &b.data[k * in_dim..(k + 1) * in_dim];
                for i in 0..out_dim {
                    let w = &a.data[i * in_dim..(i + 1) * in_dim];
                    y[k * out_dim + i] = w.iter().zip(x).map(|(w, x)| w * x).sum();
                }
            }
            (y, vec![batch, out_dim])
        }
        EOp::AddBroadcast => {
            let dim = b.data.len();
            assert_eq!(a.shape.last(), Some(&dim), "broadcast dimension differs");
            let y = a
                .data
                .iter()
                .enumerate()
                .map(|(i, &x)| x + b.data[i % dim])
                .collect();
            (y, a.shape.clone())
        }
        EOp::AddScalar => {
            let s = b.data[0];
            (map(a, |x| x + s), a.shape.clone())
        }
        EOp::MulScalar => {
            let s = b.data[0];
            (map(a, |x| x * s), a.shape.clone())
        }
        EOp::Relu => (map(a, |x| x.max(0.0)), a.shape.clone()),
        EOp::Tanh => (map(a, f32::tanh), a.shape.clone()),
        EOp::Softplus => (map(a, softplus), a.shape.clone()),
        EOp::Exp => (map(a, f32::exp), a.shape.clone()),
        EOp::Log => (map(a, f32::ln), a.shape.clone()),
        EOp::Square => (map(a, |x| x * x), a.shape.clone()),
        EOp::Clamp => {
            let (min, max) = (b.data[0], b.data[1]);
            (map(a, |x| x.clamp(min, max)), a.shape.clone())
        }
        EOp::ReduceSum => (vec![a.data.iter().sum()], vec![1]),
        EOp::ReduceMean => {
            let n = a.data.len().max(1) as f32;
            (vec![a.data.iter().sum::<f32>() / n], vec![1])
        }
    }
}
