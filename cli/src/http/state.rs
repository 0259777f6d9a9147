//! HTTP服务器状态管理

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use taskboard_core::api::AppConfig;
use taskboard_plugins::store::SqliteStore;
use tokio::sync::broadcast;

use super::models::HttpServerError;

/// 应用状态（在所有handlers间共享）
///
/// The store sits behind a single mutex so move, reorder and normalize
/// sequences from concurrent requests never interleave.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<SqliteStore>>,
    pub config: Arc<AppConfig>,
    pub stats: Arc<RwLock<ServerStats>>,
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(
        store: Arc<Mutex<SqliteStore>>,
        config: AppConfig,
        shutdown_tx: broadcast::Sender<()>,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            stats: Arc::new(RwLock::new(ServerStats::new())),
            shutdown_tx,
        }
    }

    pub fn lock_store(&self) -> Result<MutexGuard<'_, SqliteStore>, HttpServerError> {
        self.store
            .lock()
            .map_err(|_| HttpServerError::Internal("store lock poisoned".into()))
    }

    pub fn record_request(&self, endpoint: &str) {
        let mut stats = self.stats.write().unwrap_or_else(|p| p.into_inner());
        stats.increment_request(endpoint);
    }

    pub fn record_error(&self) {
        let mut stats = self.stats.write().unwrap_or_else(|p| p.into_inner());
        stats.increment_error();
    }
}

/// 服务器统计信息
pub struct ServerStats {
    pub requests_total: u64,
    pub requests_by_endpoint: HashMap<String, u64>,
    pub errors_total: u64,
    pub start_time: DateTime<Local>,
}

impl ServerStats {
    pub fn new() -> Self {
        Self {
            requests_total: 0,
            requests_by_endpoint: HashMap::new(),
            errors_total: 0,
            start_time: Local::now(),
        }
    }

    pub fn increment_request(&mut self, endpoint: &str) {
        self.requests_total += 1;
        *self
            .requests_by_endpoint
            .entry(endpoint.to_string())
            .or_insert(0) += 1;
    }

    pub fn increment_error(&mut self) {
        self.errors_total += 1;
    }

    pub fn uptime_seconds(&self) -> f64 {
        let now = Local::now();
        (now - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

impl Default for ServerStats {
    fn default() -> Self {
        Self::new()
    }
}
