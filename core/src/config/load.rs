use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Default data directory: ~/.taskboard
pub fn get_taskboard_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".taskboard"))
}

/// Load configuration.
///
/// Priority: explicit `path`, then `~/.taskboard/config.toml`, then `./config.toml`,
/// then built-in defaults. Environment variables override whatever was loaded.
pub fn load_default(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let data_dir = get_taskboard_data_dir()?;
    let home_config = data_dir.join("config.toml");
    let local_config = Path::new("config.toml");

    let mut cfg = match path {
        Some(p) => read_config(p)?,
        None if home_config.exists() => read_config(&home_config)?,
        None if local_config.exists() => read_config(local_config)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut cfg);
    resolve_paths(&mut cfg, &data_dir);
    Ok(cfg)
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("TASKBOARD_DB_PATH") {
        if !v.trim().is_empty() {
            cfg.store.path = Some(v);
        }
    }
    if let Ok(v) = std::env::var("TASKBOARD_SERVER_URL") {
        if !v.trim().is_empty() {
            cfg.client.base_url = v;
        }
    }
    if let Ok(v) = std::env::var("TASKBOARD_PORT") {
        match v.trim().parse::<u16>() {
            Ok(port) => cfg.server.port = port,
            Err(_) => tracing::warn!(value = %v, "ignoring invalid TASKBOARD_PORT"),
        }
    }
}

fn resolve_paths(cfg: &mut AppConfig, data_dir: &Path) {
    if is_blank(cfg.store.path.as_deref()) {
        cfg.store.path = Some(data_dir.join("taskboard.db").to_string_lossy().to_string());
    }
    if is_blank(cfg.client.settings_path.as_deref()) {
        cfg.client.settings_path = Some(
            data_dir
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        );
    }
    if cfg.logging.file && is_blank(cfg.logging.directory.as_deref()) {
        cfg.logging.directory = Some(data_dir.join("logs").to_string_lossy().to_string());
    }
}

fn is_blank(v: Option<&str>) -> bool {
    v.map(|s| s.trim().is_empty()).unwrap_or(true)
}
