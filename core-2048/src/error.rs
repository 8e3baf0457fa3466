#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid direction {0:?}")]
    InvalidDirection(String),
    #[error("invalid board state: {0}")]
    InvalidBoardState(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
