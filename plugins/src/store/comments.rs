use chrono::Utc;
use rusqlite::params;
use taskboard_core::error::BoardError;
use taskboard_core::model::{AddCommentInput, Comment};

use super::rows::{comment_row, task_exists, user_exists, COMMENT_SELECT};
use super::{new_id, SqliteStore, StoreError};

impl SqliteStore {
    /// Oldest first.
    pub fn list_comments(&self, task_id: &str) -> Result<Vec<Comment>, StoreError> {
        if !task_exists(&self.conn, task_id)? {
            return Err(BoardError::task_not_found(task_id).into());
        }
        let sql = format!("{COMMENT_SELECT} WHERE c.task_id = ?1 ORDER BY c.created_at ASC, c.rowid ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let comments = stmt
            .query_map(params![task_id], comment_row)?
            .collect::<Result<_, _>>()?;
        Ok(comments)
    }

    pub fn add_comment(&mut self, task_id: &str, input: AddCommentInput) -> Result<Comment, StoreError> {
        if !task_exists(&self.conn, task_id)? {
            return Err(BoardError::task_not_found(task_id).into());
        }
        if input.author_id.trim().is_empty() || input.text.trim().is_empty() {
            return Err(BoardError::validation("authorId and text are required").into());
        }
        if !user_exists(&self.conn, &input.author_id)? {
            return Err(BoardError::user_not_found(input.author_id).into());
        }

        let id = new_id();
        self.conn.execute(
            "INSERT INTO comments (id, task_id, author_id, text, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, task_id, input.author_id, input.text, Utc::now()],
        )?;

        let sql = format!("{COMMENT_SELECT} WHERE c.id = ?1");
        Ok(self.conn.query_row(&sql, params![id], comment_row)?)
    }

    /// The comment must belong to `task_id`.
    pub fn delete_comment(&mut self, task_id: &str, comment_id: &str) -> Result<(), StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM comments WHERE id = ?1 AND task_id = ?2",
            params![comment_id, task_id],
        )?;
        if removed == 0 {
            return Err(BoardError::comment_not_found(comment_id).into());
        }
        Ok(())
    }
}
