use async_trait::async_trait;

use crate::model::{
    AddCommentInput, Comment, CreateTaskInput, MoveTaskInput, ReorderEntry, Task, UpdateTaskInput,
    User,
};

/// Client-side view of the board service. Implemented over HTTP and in-process.
#[async_trait]
pub trait BoardApi: Send + Sync {
    fn name(&self) -> &str;
    async fn list_tasks(&self) -> anyhow::Result<Vec<Task>>;
    async fn get_task(&self, id: &str) -> anyhow::Result<Task>;
    async fn create_task(&self, input: CreateTaskInput) -> anyhow::Result<Task>;
    async fn update_task(&self, id: &str, input: UpdateTaskInput) -> anyhow::Result<Task>;
    async fn move_task(&self, id: &str, input: MoveTaskInput) -> anyhow::Result<Task>;
    async fn reorder_tasks(&self, entries: Vec<ReorderEntry>) -> anyhow::Result<()>;
    async fn delete_task(&self, id: &str) -> anyhow::Result<()>;
    async fn list_comments(&self, task_id: &str) -> anyhow::Result<Vec<Comment>>;
    async fn add_comment(&self, task_id: &str, input: AddCommentInput)
        -> anyhow::Result<Comment>;
    async fn delete_comment(&self, task_id: &str, comment_id: &str) -> anyhow::Result<()>;
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;
}
