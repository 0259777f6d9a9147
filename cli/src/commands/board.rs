//! Read-only views: board, stats, single task and users.

use std::collections::BTreeMap;
use taskboard_core::api::{visible_columns, BoardSettings, CliError, Column, SettingsStore, Task};

use super::cli::{BoardArgs, TaskIdArgs};
use super::Session;
use crate::render;

pub async fn handle_board(args: BoardArgs, session: &mut Session) -> Result<(), CliError> {
    let settings = if args.all {
        let stored = SettingsStore::load(session.settings_path()?);
        BoardSettings {
            sorting: stored.settings().sorting,
            theme: stored.settings().theme,
            ..Default::default()
        }
    } else {
        SettingsStore::load(session.settings_path()?).settings().clone()
    };

    session.refresh().await?;
    let projection = session.controller.projection(&settings);
    let stats = session.controller.stats();
    let visible = visible_columns(&settings.filters);

    let by_column: BTreeMap<Column, &[Task]> = visible
        .iter()
        .map(|c| (*c, projection.column(*c)))
        .collect();
    session.emit(&by_column, || {
        render::render_board(&projection, &settings, &stats, &visible)
    })
}

pub async fn handle_list(session: &mut Session) -> Result<(), CliError> {
    session.refresh().await?;
    let mut tasks = session.controller.tasks().to_vec();
    tasks.sort_by_key(|t| (t.column, t.position));
    session.emit(&tasks, || {
        tasks
            .iter()
            .map(|t| format!("{:<12}{}", t.column.label(), render::render_task_line(t)))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

pub async fn handle_stats(session: &mut Session) -> Result<(), CliError> {
    session.refresh().await?;
    let stats = session.controller.stats();
    session.emit(&stats, || render::render_stats(&stats))
}

pub async fn handle_show(args: TaskIdArgs, session: &mut Session) -> Result<(), CliError> {
    let task = session
        .controller
        .api()
        .get_task(&args.id)
        .await
        .map_err(CliError::from_client)?;
    session.emit(&task, || render::render_task(&task))
}

pub async fn handle_users(session: &mut Session) -> Result<(), CliError> {
    let users = session
        .controller
        .list_users()
        .await
        .map_err(CliError::from_client)?;
    session.emit(&users, || render::render_users(&users))
}
