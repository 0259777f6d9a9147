//! Row decoding and task hydration shared by the query modules.

use std::collections::HashMap;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use taskboard_core::model::{Column, Comment, Tag, Task, User};

use super::StoreError;

pub(super) const TASK_COLUMNS: &str =
    "id, title, description, state, tags, position, created_at, updated_at";

pub(super) fn task_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        column: column_at(row, 3)?,
        tags: tags_at(row, 4)?,
        assignees: Vec::new(),
        comments: Vec::new(),
        position: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(super) fn column_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Column> {
    let raw: String = row.get(idx)?;
    raw.parse::<Column>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn tags_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<Tag>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(super) fn user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        avatar_url: row.get(2)?,
    })
}

/// Expects `id, text, created_at, author_id, author_name, author_avatar_url`.
pub(super) fn comment_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        text: row.get(1)?,
        created_at: row.get(2)?,
        author: User {
            id: row.get(3)?,
            name: row.get(4)?,
            avatar_url: row.get(5)?,
        },
    })
}

pub(super) const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.text, c.created_at, u.id, u.name, u.avatar_url, c.task_id
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

pub(super) fn task_exists(conn: &Connection, id: &str) -> Result<bool, StoreError> {
    Ok(conn
        .query_row("SELECT 1 FROM tasks WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?
        .is_some())
}

pub(super) fn user_exists(conn: &Connection, id: &str) -> Result<bool, StoreError> {
    Ok(conn
        .query_row("SELECT 1 FROM users WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?
        .is_some())
}

/// Attach assignees and comments. `only` narrows the lookups to one task.
pub(super) fn hydrate(
    conn: &Connection,
    tasks: &mut [Task],
    only: Option<&str>,
) -> Result<(), StoreError> {
    let mut assignees: HashMap<String, Vec<User>> = HashMap::new();
    {
        let mut stmt = conn.prepare(
            r#"
            SELECT u.id, u.name, u.avatar_url, ta.task_id
            FROM task_assignees ta
            JOIN users u ON u.id = ta.user_id
            WHERE (?1 IS NULL OR ta.task_id = ?1)
            ORDER BY ta.rowid ASC
            "#,
        )?;
        let rows = stmt.query_map(params![only], |row| {
            Ok((row.get::<_, String>(3)?, user_row(row)?))
        })?;
        for row in rows {
            let (task_id, user) = row?;
            assignees.entry(task_id).or_default().push(user);
        }
    }

    let mut comments: HashMap<String, Vec<Comment>> = HashMap::new();
    {
        let sql = format!(
            "{COMMENT_SELECT} WHERE (?1 IS NULL OR c.task_id = ?1) ORDER BY c.created_at ASC, c.rowid ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![only], |row| {
            Ok((row.get::<_, String>(6)?, comment_row(row)?))
        })?;
        for row in rows {
            let (task_id, comment) = row?;
            comments.entry(task_id).or_default().push(comment);
        }
    }

    for task in tasks.iter_mut() {
        task.assignees = assignees.remove(&task.id).unwrap_or_default();
        task.comments = comments.remove(&task.id).unwrap_or_default();
    }
    Ok(())
}
