//! Position maintenance: normalize, move and bulk reorder.
//!
//! Each public operation runs in one transaction. Dropping the transaction on an
//! early return rolls every statement back.

use std::collections::HashSet;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use taskboard_core::error::BoardError;
use taskboard_core::model::{Column, MoveTaskInput, Placement, ReorderEntry, Task};

use super::rows::column_at;
use super::{SqliteStore, StoreError};

impl SqliteStore {
    /// Renumber `column` to 0..n-1 keeping the current relative order.
    pub fn normalize_column(&mut self, column: Column) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let count = normalize(&tx, column)?;
        tx.commit()?;
        Ok(count)
    }

    /// Remove the task from its column and insert it into `input.column` at
    /// `input.position`, then renumber every affected column.
    pub fn move_task(&mut self, id: &str, input: MoveTaskInput) -> Result<Task, StoreError> {
        let tx = self.conn.transaction()?;
        let from = placement(&tx, id)?.ok_or_else(|| BoardError::task_not_found(id))?;
        let to = Placement {
            column: input.column,
            position: input.position,
        };
        tracing::debug!(
            target: "taskboard.store",
            stage = "store.move.in",
            task_id = id,
            from = %from.column,
            from_position = from.position,
            to = %to.column,
            to_position = to.position,
        );

        tx.execute(
            "UPDATE tasks SET position = position - 1 WHERE state = ?1 AND position > ?2",
            params![from.column.as_str(), from.position],
        )?;
        tx.execute(
            "UPDATE tasks SET position = position + 1 WHERE state = ?1 AND position >= ?2",
            params![to.column.as_str(), to.position],
        )?;
        tx.execute(
            "UPDATE tasks SET state = ?1, position = ?2, updated_at = ?3 WHERE id = ?4",
            params![to.column.as_str(), to.position, Utc::now(), id],
        )?;

        normalize(&tx, from.column)?;
        if from.column != to.column {
            normalize(&tx, to.column)?;
        }
        tx.commit()?;

        tracing::debug!(target: "taskboard.store", stage = "store.move.out", task_id = id);
        self.get_task(id)
    }

    /// Write every assignment verbatim as one unit. No normalization.
    pub fn reorder_tasks(&mut self, entries: &[ReorderEntry]) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Err(BoardError::validation("tasks array must not be empty").into());
        }
        let mut seen = HashSet::with_capacity(entries.len());
        if let Some(dup) = entries.iter().find(|e| !seen.insert(e.id.as_str())) {
            return Err(BoardError::validation(format!("task {} appears more than once", dup.id)).into());
        }

        let tx = self.conn.transaction()?;
        let now = Utc::now();
        {
            let mut update = tx.prepare(
                "UPDATE tasks SET state = ?1, position = ?2, updated_at = ?3 WHERE id = ?4",
            )?;
            for entry in entries {
                let changed =
                    update.execute(params![entry.column.as_str(), entry.position, now, entry.id])?;
                if changed == 0 {
                    tracing::warn!(
                        target: "taskboard.store",
                        stage = "store.reorder.rollback",
                        task_id = %entry.id,
                        "unknown task in reorder batch"
                    );
                    return Err(BoardError::task_not_found(entry.id.as_str()).into());
                }
            }
        }
        tx.commit()?;

        tracing::debug!(
            target: "taskboard.store",
            stage = "store.reorder.out",
            count = entries.len()
        );
        Ok(())
    }

    /// Current positions of `column` in stored order.
    pub fn column_positions(&self, column: Column) -> Result<Vec<(String, u32)>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, position FROM tasks WHERE state = ?1 ORDER BY position ASC, created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![column.as_str()], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}

pub(super) fn placement(conn: &Connection, id: &str) -> Result<Option<Placement>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT state, position FROM tasks WHERE id = ?1",
            params![id],
            |row| {
                Ok(Placement {
                    column: column_at(row, 0)?,
                    position: row.get(1)?,
                })
            },
        )
        .optional()?)
}

/// Ties on position fall back to creation time, then id.
pub(super) fn normalize(conn: &Connection, column: Column) -> Result<usize, StoreError> {
    let ids: Vec<String> = {
        let mut stmt = conn.prepare(
            "SELECT id FROM tasks WHERE state = ?1 ORDER BY position ASC, created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![column.as_str()], |row| row.get(0))?;
        rows.collect::<Result<_, _>>()?
    };

    let mut update = conn.prepare("UPDATE tasks SET position = ?1 WHERE id = ?2")?;
    for (index, id) in ids.iter().enumerate() {
        update.execute(params![index as u32, id])?;
    }
    Ok(ids.len())
}
