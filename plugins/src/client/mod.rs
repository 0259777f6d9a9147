pub mod http_client;
pub mod local;

pub use http_client::{BoardHttpClient, BoardHttpError, BoardHttpErrorKind};
pub use local::LocalBoard;
