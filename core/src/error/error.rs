use thiserror::Error;

use super::board::BoardError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("{0}")]
    Board(#[from] BoardError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    /// Lift a client-side failure, keeping board errors typed when the transport
    /// layer carried one.
    pub fn from_client(err: anyhow::Error) -> Self {
        match err.downcast::<BoardError>() {
            Ok(board) => Self::Board(board),
            Err(other) => Self::Anyhow(other),
        }
    }
}
