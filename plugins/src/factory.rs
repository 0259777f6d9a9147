use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use taskboard_core::api::{get_taskboard_data_dir, AppConfig, BoardApi};

use crate::client::{BoardHttpClient, LocalBoard};
use crate::store::SqliteStore;

/// Where client commands send their calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The board server at `client.base_url`.
    Remote,
    /// The database file directly, without a server.
    Local,
}

pub fn open_store(cfg: &AppConfig) -> Result<SqliteStore> {
    let path = match &cfg.store.path {
        Some(path) => PathBuf::from(path),
        None => get_taskboard_data_dir()?.join("taskboard.db"),
    };
    SqliteStore::open(&path, Duration::from_millis(cfg.store.busy_timeout_ms))
        .with_context(|| format!("Failed to open board database: {:?}", path))
}

pub fn build_remote(cfg: &AppConfig) -> Result<Arc<dyn BoardApi>> {
    let client = BoardHttpClient::new(&cfg.client.base_url, cfg.client.timeout_ms)?;
    Ok(Arc::new(client))
}

pub fn build_local(store: Arc<Mutex<SqliteStore>>) -> Arc<dyn BoardApi> {
    Arc::new(LocalBoard::new(store))
}

pub fn build_board_api(cfg: &AppConfig, kind: BackendKind) -> Result<Arc<dyn BoardApi>> {
    match kind {
        BackendKind::Remote => build_remote(cfg),
        BackendKind::Local => {
            let store = open_store(cfg)?;
            Ok(build_local(Arc::new(Mutex::new(store))))
        }
    }
}
