use taskboard_core::error::BoardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl StoreError {
    pub fn board(&self) -> Option<&BoardError> {
        match self {
            Self::Board(err) => Some(err),
            _ => None,
        }
    }
}

/// Anything the store did not classify is a failed unit of work.
impl From<StoreError> for BoardError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Board(board) => board,
            other => BoardError::TransactionFailure(other.to_string()),
        }
    }
}
