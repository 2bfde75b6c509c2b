use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("entry has no identifier; save it before updating")]
    MissingIdentifier,

    #[error("entry {0} not found")]
    NotFound(Uuid),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("access denied")]
    AccessDenied,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt data file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
