use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use taskboard_core::error::BoardError;
use taskboard_core::model::{CreateTaskInput, Task, UpdateTaskInput};

use super::positions::{normalize, placement};
use super::rows::{hydrate, task_row, user_exists, TASK_COLUMNS};
use super::{new_id, SqliteStore, StoreError};

impl SqliteStore {
    /// Every task, hydrated, ordered by column then position.
    pub fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut tasks = stmt
            .query_map([], task_row)?
            .collect::<Result<Vec<_>, _>>()?;
        tasks.sort_by(|a, b| {
            a.column
                .cmp(&b.column)
                .then(a.position.cmp(&b.position))
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        hydrate(&self.conn, &mut tasks, None)?;
        Ok(tasks)
    }

    pub fn get_task(&self, id: &str) -> Result<Task, StoreError> {
        let mut task = fetch_task(&self.conn, id)?.ok_or_else(|| BoardError::task_not_found(id))?;
        hydrate(&self.conn, std::slice::from_mut(&mut task), Some(id))?;
        Ok(task)
    }

    /// Insert at the end of the requested column (default backlog).
    pub fn create_task(&mut self, input: CreateTaskInput) -> Result<Task, StoreError> {
        if input.title.trim().is_empty() {
            return Err(BoardError::validation("title is required").into());
        }
        let column = input.column.unwrap_or_default();
        let id = new_id();
        let now = Utc::now();
        let tags = serde_json::to_string(&input.tags.unwrap_or_default())?;

        let tx = self.conn.transaction()?;
        let position: u32 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM tasks WHERE state = ?1",
            params![column.as_str()],
            |row| row.get(0),
        )?;
        tx.execute(
            r#"
            INSERT INTO tasks (id, title, description, state, tags, position, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
            params![
                id,
                input.title,
                input.description.unwrap_or_default(),
                column.as_str(),
                tags,
                position,
                now
            ],
        )?;
        if let Some(assignee_ids) = input.assignee_ids {
            set_assignees(&tx, &id, &assignee_ids)?;
        }
        tx.commit()?;

        tracing::info!(
            target: "taskboard.store",
            task_id = %id,
            column = %column,
            position,
            "task created"
        );
        self.get_task(&id)
    }

    /// Field edit. Column and position are untouched.
    pub fn update_task(&mut self, id: &str, input: UpdateTaskInput) -> Result<Task, StoreError> {
        if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(BoardError::validation("title must not be empty").into());
        }

        let tx = self.conn.transaction()?;
        if fetch_task(&tx, id)?.is_none() {
            return Err(BoardError::task_not_found(id).into());
        }
        if let Some(title) = &input.title {
            tx.execute("UPDATE tasks SET title = ?1 WHERE id = ?2", params![title, id])?;
        }
        if let Some(description) = &input.description {
            tx.execute(
                "UPDATE tasks SET description = ?1 WHERE id = ?2",
                params![description, id],
            )?;
        }
        if let Some(tags) = &input.tags {
            tx.execute(
                "UPDATE tasks SET tags = ?1 WHERE id = ?2",
                params![serde_json::to_string(tags)?, id],
            )?;
        }
        if let Some(assignee_ids) = &input.assignee_ids {
            tx.execute("DELETE FROM task_assignees WHERE task_id = ?1", params![id])?;
            set_assignees(&tx, id, assignee_ids)?;
        }
        tx.execute(
            "UPDATE tasks SET updated_at = ?1 WHERE id = ?2",
            params![Utc::now(), id],
        )?;
        tx.commit()?;

        self.get_task(id)
    }

    /// Delete the task (cascading to assignees and comments) and close the gap it left.
    pub fn delete_task(&mut self, id: &str) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let former = placement(&tx, id)?.ok_or_else(|| BoardError::task_not_found(id))?;
        tx.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        normalize(&tx, former.column)?;
        tx.commit()?;

        tracing::info!(target: "taskboard.store", task_id = id, column = %former.column, "task deleted");
        Ok(())
    }
}

fn fetch_task(conn: &Connection, id: &str) -> Result<Option<Task>, StoreError> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], task_row).optional()?)
}

fn set_assignees(conn: &Connection, task_id: &str, user_ids: &[String]) -> Result<(), StoreError> {
    let mut insert =
        conn.prepare("INSERT OR IGNORE INTO task_assignees (task_id, user_id) VALUES (?1, ?2)")?;
    for user_id in user_ids {
        if !user_exists(conn, user_id)? {
            return Err(BoardError::user_not_found(user_id.as_str()).into());
        }
        insert.execute(params![task_id, user_id])?;
    }
    Ok(())
}
