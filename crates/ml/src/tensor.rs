use crate::graph::{self, EOp, Node};
use crate::recorder::Recorder;
use crate::TensorStore;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A dense, row-major `f32` tensor.
///
/// The `id` is unique for the lifetime of the process and is how recorded
/// [`Node`]s refer to their operands.
#[derive(Clone, Debug)]
pub struct Tensor {
    pub id: usize,
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
    pub requires_grad: bool,
    pub grad: Option<Vec<f32>>,
}

impl Tensor {
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>) -> Self {
        assert_eq!(shape.iter().product::<usize>(), data.len());
        Self {
            id: next_id(),
            data,
            shape,
            requires_grad: false,
            grad: None,
        }
    }

    pub fn scalar(value: f32) -> Self {
        Self::from_vec(vec![1], vec![value])
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self::from_vec(shape, vec![0.0; len])
    }

    #[must_use]
    pub fn with_grad(mut self) -> Self {
        self.requires_grad = true;
        self
    }

    pub fn set_requires_grad(&mut self) {
        self.requires_grad = true;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn grad(&self) -> Option<&[f32]> {
        self.grad.as_deref()
    }

    fn apply(
        &self,
        op: EOp,
        other: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Tensor {
        let (data, shape) = graph::eval(op, self, other);
        let out = Tensor::from_vec(shape, data);
        tensors.entry(self.id).or_insert_with(|| self.clone());
        tensors.entry(other.id).or_insert_with(|| other.clone());
        tensors.insert(out.id, out.clone());
        recorder.record(Node {
            op,
            a: self.id,
            b: other.id,
            out: out.id,
        });
        out
    }

    pub fn add(&self, other: &Tensor, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Add, other, r, t)
    }

    pub fn sub(&self, other: &Tensor, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Sub, other, r, t)
    }

    pub fn mul(&self, other: &Tensor, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Mul, other, r, t)
    }

    pub fn div(&self, other: &Tensor, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Div, other, r, t)
    }

    /// `self[out, in] x x[batch, in] -> [batch, out]`
    pub fn matmul(&self, x: &Tensor, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::MatMul, x, r, t)
    }

    /// Adds a `[d]` vector to every row of a `[batch, d]` tensor.
    pub fn add_broadcast(&self, row: &Tensor, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::AddBroadcast, row, r, t)
    }

    pub fn add_scalar(&self, s: f32, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::AddScalar, &Tensor::scalar(s), r, t)
    }

    pub fn mul_scalar(&self, s: f32, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::MulScalar, &Tensor::scalar(s), r, t)
    }

    pub fn relu(&self, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Relu, self, r, t)
    }

    pub fn tanh(&self, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Tanh, self, r, t)
    }

    pub fn softplus(&self, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Softplus, self, r, t)
    }

    pub fn exp(&self, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Exp, self, r, t)
    }

    pub fn log(&self, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Log, self, r, t)
    }

    pub fn square(&self, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Square, self, r, t)
    }

    pub fn clamp(&self, min: f32, max: f32, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::Clamp, &Tensor::from_vec(vec![2], vec![min, max]), r, t)
    }

    pub fn reduce_sum(&self, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::ReduceSum, self, r, t)
    }

    pub fn reduce_mean(&self, r: &mut impl Recorder, t: &mut TensorStore) -> Tensor {
        self.apply(EOp::ReduceMean, self, r, t)
    }
}
