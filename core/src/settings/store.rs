//! Load-at-start / save-on-change persistence for board settings.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::{BoardSettings, SortDirection, SortField, Theme};
use crate::model::{Column, Tag};

pub struct SettingsStore {
    path: PathBuf,
    settings: BoardSettings,
}

impl SettingsStore {
    /// Read settings from `path`. A missing or unreadable file yields defaults.
    pub fn load<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let settings = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
                BoardSettings::default()
            }),
            Err(_) => BoardSettings::default(),
        };
        Self { path, settings }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create settings directory: {:?}", parent)
                })?;
            }
        }
        let json =
            serde_json::to_string_pretty(&self.settings).context("Failed to serialize settings")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))
    }

    fn update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BoardSettings),
    {
        f(&mut self.settings);
        self.save()
    }

    pub fn toggle_tag(&mut self, tag: Tag) -> Result<()> {
        self.update(|s| toggle(&mut s.filters.tags, tag))
    }

    pub fn collapse_column(&mut self, column: Column) -> Result<()> {
        self.update(|s| insert_unique(&mut s.filters.collapsed_columns, column))
    }

    pub fn expand_column(&mut self, column: Column) -> Result<()> {
        self.update(|s| s.filters.collapsed_columns.retain(|c| *c != column))
    }

    pub fn toggle_column(&mut self, column: Column) -> Result<()> {
        self.update(|s| toggle(&mut s.filters.collapsed_columns, column))
    }

    pub fn hide_column(&mut self, column: Column) -> Result<()> {
        self.update(|s| insert_unique(&mut s.filters.hidden_columns, column))
    }

    pub fn show_column(&mut self, column: Column) -> Result<()> {
        self.update(|s| s.filters.hidden_columns.retain(|c| *c != column))
    }

    pub fn clear_filters(&mut self) -> Result<()> {
        self.update(|s| s.filters = Default::default())
    }

    pub fn set_sort_field(&mut self, field: SortField) -> Result<()> {
        self.update(|s| s.sorting.field = field)
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) -> Result<()> {
        self.update(|s| s.sorting.direction = direction)
    }

    pub fn toggle_sort_direction(&mut self) -> Result<()> {
        self.update(|s| s.sorting.direction = s.sorting.direction.toggled())
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.update(|s| s.theme = theme)
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, value: T) {
    match items.iter().position(|v| *v == value) {
        Some(idx) => {
            items.remove(idx);
        }
        None => items.push(value),
    }
}

fn insert_unique<T: PartialEq>(items: &mut Vec<T>, value: T) {
    if !items.contains(&value) {
        items.push(value);
    }
}
