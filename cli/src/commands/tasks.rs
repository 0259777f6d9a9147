//! Task mutations. `drop` is the optimistic path; everything else refetches.

use serde_json::json;
use taskboard_core::api::{
    CliError, CreateTaskInput, DropOutcome, DropTarget, MoveTaskInput, ReorderPlan,
    UpdateTaskInput,
};

use super::cli::{CreateArgs, DropArgs, MoveArgs, TaskIdArgs, UpdateArgs};
use super::Session;
use crate::render;

pub async fn handle_create(args: CreateArgs, session: &mut Session) -> Result<(), CliError> {
    let input = CreateTaskInput {
        title: args.title,
        description: args.description,
        column: args.column,
        tags: (!args.tags.is_empty()).then_some(args.tags),
        assignee_ids: (!args.assignees.is_empty()).then_some(args.assignees),
    };
    let task = session
        .controller
        .create_task(input)
        .await
        .map_err(CliError::from_client)?;
    session.emit(&task, || format!("created\n{}", render::render_task_line(&task)))
}

pub fn update_input(args: UpdateArgs) -> UpdateTaskInput {
    let assignee_ids = if args.clear_assignees {
        Some(Vec::new())
    } else {
        args.assignees
    };
    UpdateTaskInput {
        title: args.title,
        description: args.description,
        tags: args.tags,
        assignee_ids,
    }
}

pub async fn handle_update(args: UpdateArgs, session: &mut Session) -> Result<(), CliError> {
    let id = args.id.clone();
    let input = update_input(args);
    if input.is_empty() {
        return Err(CliError::Command(
            "nothing to update: pass --title, --description, --tag or --assignee".into(),
        ));
    }
    let task = session
        .controller
        .update_task(&id, input)
        .await
        .map_err(CliError::from_client)?;
    session.emit(&task, || render::render_task(&task))
}

pub async fn handle_move(args: MoveArgs, session: &mut Session) -> Result<(), CliError> {
    let input = MoveTaskInput {
        column: args.column,
        position: args.position,
    };
    let task = session
        .controller
        .move_task(&args.id, input)
        .await
        .map_err(CliError::from_client)?;
    session.emit(&task, || {
        format!(
            "moved {} to {} #{}",
            task.title,
            task.column.label(),
            task.position
        )
    })
}

pub fn drop_target(args: &DropArgs) -> Result<DropTarget, CliError> {
    match (&args.onto, args.column) {
        (Some(onto), None) => Ok(DropTarget::Task(onto.clone())),
        (None, Some(column)) => Ok(DropTarget::Column(column)),
        _ => Err(CliError::Command(
            "drop needs exactly one of --onto or --column".into(),
        )),
    }
}

fn describe(plan: &ReorderPlan) -> String {
    format!(
        "{}: {} #{} -> {} #{} ({} positions written)",
        plan.task_id,
        plan.from.column.label(),
        plan.from.position,
        plan.to.column.label(),
        plan.to.position,
        plan.batch.len()
    )
}

pub async fn handle_drop(args: DropArgs, session: &mut Session) -> Result<(), CliError> {
    let target = drop_target(&args)?;
    session.refresh().await?;

    match session.controller.drop_task(&args.id, &target).await? {
        DropOutcome::Unchanged => session.emit(&json!({ "changed": false }), || {
            "already in place".to_string()
        }),
        DropOutcome::Applied(plan) => session.emit(
            &json!({ "changed": true, "batch": plan.batch }),
            || format!("moved {}", describe(&plan)),
        ),
        DropOutcome::RolledBack { plan, error } => Err(CliError::Command(format!(
            "reorder rejected, board restored ({}): {error}",
            describe(&plan)
        ))),
    }
}

pub async fn handle_delete(args: TaskIdArgs, session: &mut Session) -> Result<(), CliError> {
    session
        .controller
        .delete_task(&args.id)
        .await
        .map_err(CliError::from_client)?;
    session.emit(&json!({ "success": true }), || format!("deleted {}", args.id))
}
