use crate::graph::Node;

/// Sink for the operations performed on tensors.
pub trait Recorder {
    fn record(&mut self, node: Node);
    fn nodes(&self) -> &[Node];
}
