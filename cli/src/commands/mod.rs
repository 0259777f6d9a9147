//! Client-side command handlers. Every board mutation goes through one
//! [`ReorderController`], so the CLI sees the same cache the optimistic path keeps.

pub mod board;
pub mod cli;
pub mod comments;
pub mod settings;
pub mod tasks;

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use taskboard_core::api::{get_taskboard_data_dir, AppConfig, BoardApi, CliError, ReorderController};
use taskboard_plugins::factory::{build_board_api, BackendKind};

/// Resolved backend plus output mode for one invocation.
pub struct Session {
    pub cfg: AppConfig,
    pub controller: ReorderController<dyn BoardApi>,
    pub json: bool,
}

impl Session {
    pub fn open(cfg: AppConfig, kind: BackendKind, json: bool) -> Result<Self, CliError> {
        let api = build_board_api(&cfg, kind)?;
        tracing::debug!(backend = api.name(), "board backend ready");
        Ok(Self::with_api(cfg, api, json))
    }

    pub fn with_api(cfg: AppConfig, api: Arc<dyn BoardApi>, json: bool) -> Self {
        Self {
            cfg,
            controller: ReorderController::new(api),
            json,
        }
    }

    /// Load the cache from the backend.
    pub async fn refresh(&mut self) -> Result<(), CliError> {
        self.controller
            .refresh()
            .await
            .map_err(CliError::from_client)?;
        Ok(())
    }

    pub fn settings_path(&self) -> Result<PathBuf, CliError> {
        settings_path(&self.cfg)
    }

    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<(), CliError> {
        emit(self.json, value, text)
    }
}

/// `client.settings_path`, or `settings.json` in the data directory.
pub fn settings_path(cfg: &AppConfig) -> Result<PathBuf, CliError> {
    match cfg.client.settings_path.as_deref() {
        Some(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(get_taskboard_data_dir()?.join("settings.json")),
    }
}

/// Print `value` as JSON when `json` is set, else the text rendering.
pub fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<(), CliError> {
    if json {
        let out = serde_json::to_string_pretty(value)
            .map_err(|e| CliError::Command(format!("failed to encode output: {e}")))?;
        println!("{out}");
    } else {
        println!("{}", text());
    }
    Ok(())
}
