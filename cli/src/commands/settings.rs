//! Persisted view settings. Works offline: no backend is contacted.

use taskboard_core::api::{AppConfig, CliError, SettingsStore};

use super::cli::{SettingsArgs, SettingsCommand};
use super::{emit, settings_path};
use crate::render;

pub fn handle_settings(args: SettingsArgs, cfg: &AppConfig, json: bool) -> Result<(), CliError> {
    let mut store = SettingsStore::load(settings_path(cfg)?);
    apply(&mut store, args.command.unwrap_or(SettingsCommand::Show))?;
    let settings = store.settings();
    emit(json, settings, || render::render_settings(settings))
}

/// Apply one change; each change is saved immediately.
pub fn apply(store: &mut SettingsStore, command: SettingsCommand) -> Result<(), CliError> {
    match command {
        SettingsCommand::Show => Ok(()),
        SettingsCommand::ToggleTag { tag } => store.toggle_tag(tag),
        SettingsCommand::Collapse { column } => store.collapse_column(column),
        SettingsCommand::Expand { column } => store.expand_column(column),
        SettingsCommand::ToggleColumn { column } => store.toggle_column(column),
        SettingsCommand::Hide { column } => store.hide_column(column),
        SettingsCommand::Unhide { column } => store.show_column(column),
        SettingsCommand::ClearFilters => store.clear_filters(),
        SettingsCommand::Sort { field, direction } => {
            store.set_sort_field(field.into())?;
            match direction {
                Some(direction) => store.set_sort_direction(direction.into()),
                None => Ok(()),
            }
        }
        SettingsCommand::ToggleDirection => store.toggle_sort_direction(),
        SettingsCommand::Theme { theme } => store.set_theme(theme.into()),
    }
    .map_err(CliError::Anyhow)
}
