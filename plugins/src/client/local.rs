//! In-process [`BoardApi`] over a shared [`SqliteStore`].

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use taskboard_core::api::{
    AddCommentInput, BoardApi, BoardError, Comment, CreateTaskInput, MoveTaskInput, ReorderEntry,
    Task, UpdateTaskInput, User,
};

use crate::store::{SqliteStore, StoreError};

#[derive(Clone)]
pub struct LocalBoard {
    store: Arc<Mutex<SqliteStore>>,
}

impl LocalBoard {
    pub fn new(store: Arc<Mutex<SqliteStore>>) -> Self {
        Self { store }
    }

    pub fn from_store(store: SqliteStore) -> Self {
        Self::new(Arc::new(Mutex::new(store)))
    }

    pub fn store(&self) -> &Arc<Mutex<SqliteStore>> {
        &self.store
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, SqliteStore>> {
        self.store
            .lock()
            .map_err(|_| anyhow::anyhow!("board store lock poisoned"))
    }
}

/// Surface store failures as typed board errors.
fn board<T>(result: Result<T, StoreError>) -> anyhow::Result<T> {
    result.map_err(|err| anyhow::Error::new(BoardError::from(err)))
}

#[async_trait]
impl BoardApi for LocalBoard {
    fn name(&self) -> &str {
        "local"
    }

    async fn list_tasks(&self) -> anyhow::Result<Vec<Task>> {
        board(self.lock()?.list_tasks())
    }

    async fn get_task(&self, id: &str) -> anyhow::Result<Task> {
        board(self.lock()?.get_task(id))
    }

    async fn create_task(&self, input: CreateTaskInput) -> anyhow::Result<Task> {
        board(self.lock()?.create_task(input))
    }

    async fn update_task(&self, id: &str, input: UpdateTaskInput) -> anyhow::Result<Task> {
        board(self.lock()?.update_task(id, input))
    }

    async fn move_task(&self, id: &str, input: MoveTaskInput) -> anyhow::Result<Task> {
        board(self.lock()?.move_task(id, input))
    }

    async fn reorder_tasks(&self, entries: Vec<ReorderEntry>) -> anyhow::Result<()> {
        board(self.lock()?.reorder_tasks(&entries))
    }

    async fn delete_task(&self, id: &str) -> anyhow::Result<()> {
        board(self.lock()?.delete_task(id))
    }

    async fn list_comments(&self, task_id: &str) -> anyhow::Result<Vec<Comment>> {
        board(self.lock()?.list_comments(task_id))
    }

    async fn add_comment(
        &self,
        task_id: &str,
        input: AddCommentInput,
    ) -> anyhow::Result<Comment> {
        board(self.lock()?.add_comment(task_id, input))
    }

    async fn delete_comment(&self, task_id: &str, comment_id: &str) -> anyhow::Result<()> {
        board(self.lock()?.delete_comment(task_id, comment_id))
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        board(self.lock()?.list_users())
    }
}
