//! # ml
//!
//! A deliberately small deep-learning toolkit: dense `f32` tensors, a
//! recording graph, a reverse-mode autodiff tape, fully connected layers,
//! the Adam optimiser and a diagonal Gaussian distribution.
//!
//! Every differentiable operation takes a [`Recorder`] and a tensor store
//! (`HashMap<usize, Tensor>`). Recording into a [`graph::Graph`] gives a
//! replayable forward pass; recording into a [`tape::Tape`] additionally
//! allows [`tape::Tape::backward`] to compute gradients.

pub mod dist;
pub mod error;
pub mod graph;
pub mod nn;
pub mod optim;
pub mod recorder;
pub mod tape;
pub mod tensor;

pub use dist::Normal;
pub use error::MlError;
pub use graph::{EOp, Graph, Node};
pub use nn::Dense;
pub use optim::Adam;
pub use recorder::Recorder;
pub use tape::Tape;
pub use tensor::Tensor;

/// Storage for every tensor touched by a recorded computation, keyed by id.
pub type TensorStore = std::collections::HashMap<usize, Tensor>;
