pub mod load;
pub mod types;

pub use load::{get_taskboard_data_dir, load_default};
pub use types::{AppConfig, ClientConfig, LoggingConfig, ServerConfig, StoreConfig};
