use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlError {
    #[error("tensor {0} is not in the tensor store")]
    MissingTensor(usize),
    #[error("parameter {0} has no gradient")]
    MissingGradient(usize),
    #[error("optimizer tracks {expected} parameters, got {found}")]
    ParamCountMismatch { expected: usize, found: usize },
}
