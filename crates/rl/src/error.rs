use ml::MlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("environment {what} is {found}, config expects {expected}")]
    EnvMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("state has {found} values, expected {expected}")]
    StateSize { expected: usize, found: usize },
    #[error("batch buffers disagree: {observations} observations, {actions} actions, {returns} returns")]
    BatchMismatch {
        observations: usize,
        actions: usize,
        returns: usize,
    },
    #[error("training batch is empty")]
    EmptyBatch,
    #[error(transparent)]
    Ml(#[from] MlError),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
