pub mod board;
#[allow(clippy::module_inception)]
pub mod error;

pub use board::{BoardError, EntityKind, ErrorCode};
pub use error::CliError;
