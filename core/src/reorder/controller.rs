//! Optimistic drop handling on top of [`TaskCache`] and a [`BoardApi`].

use std::sync::Arc;

use crate::board::{project, task_stats, ColumnProjection, TaskStats};
use crate::error::BoardError;
use crate::model::{
    AddCommentInput, Comment, CreateTaskInput, MoveTaskInput, Task, UpdateTaskInput, User,
};
use crate::settings::BoardSettings;

use super::cache::{PatchId, TaskCache};
use super::plan::{plan_drop, DropTarget, ReorderPlan};
use super::traits::BoardApi;

/// A drop whose patch is already in the cache and whose request has not settled.
#[derive(Debug, Clone)]
pub struct PendingDrop {
    patch: PatchId,
    plan: ReorderPlan,
}

impl PendingDrop {
    pub fn plan(&self) -> &ReorderPlan {
        &self.plan
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The task already sat at the target; nothing was sent.
    Unchanged,
    Applied(ReorderPlan),
    RolledBack { plan: ReorderPlan, error: String },
}

pub struct ReorderController<A: BoardApi + ?Sized> {
    api: Arc<A>,
    cache: TaskCache,
}

impl<A: BoardApi + ?Sized> ReorderController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            cache: TaskCache::default(),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    pub fn tasks(&self) -> &[Task] {
        self.cache.tasks()
    }

    pub fn projection(&self, settings: &BoardSettings) -> ColumnProjection {
        project(self.cache.tasks(), &settings.filters, &settings.sorting)
    }

    pub fn stats(&self) -> TaskStats {
        task_stats(self.cache.tasks())
    }

    /// Replace the cache with the server's task list.
    pub async fn refresh(&mut self) -> anyhow::Result<usize> {
        let tasks = self.api.list_tasks().await?;
        let count = tasks.len();
        self.cache.replace(tasks);
        tracing::debug!(target: "taskboard.reorder", api = self.api.name(), count, "cache refreshed");
        Ok(count)
    }

    /// Plan the drop and patch the cache synchronously.
    ///
    /// `Ok(None)` means the drop changes nothing and no request should be sent.
    pub fn begin_drop(
        &mut self,
        task_id: &str,
        target: &DropTarget,
    ) -> Result<Option<PendingDrop>, BoardError> {
        let Some(plan) = plan_drop(self.cache.tasks(), task_id, target)? else {
            tracing::debug!(target: "taskboard.reorder", task_id, "drop is a no-op");
            return Ok(None);
        };
        let patch = self.cache.apply(&plan.batch);
        tracing::debug!(
            target: "taskboard.reorder",
            task_id,
            from = %plan.from.column,
            to = %plan.to.column,
            position = plan.to.position,
            batch = plan.batch.len(),
            "optimistic patch applied"
        );
        Ok(Some(PendingDrop { patch, plan }))
    }

    /// Send the pending drop's batch. Does not touch the cache.
    pub async fn dispatch(&self, pending: &PendingDrop) -> anyhow::Result<()> {
        self.api.reorder_tasks(pending.plan.batch.clone()).await
    }

    /// Keep the patch on success, undo it on failure.
    pub fn settle(&mut self, pending: PendingDrop, result: anyhow::Result<()>) -> DropOutcome {
        match result {
            Ok(()) => {
                self.cache.commit(pending.patch);
                DropOutcome::Applied(pending.plan)
            }
            Err(err) => {
                self.cache.undo(pending.patch);
                tracing::warn!(
                    target: "taskboard.reorder",
                    task_id = %pending.plan.task_id,
                    error = %err,
                    "reorder rejected, optimistic patch rolled back"
                );
                DropOutcome::RolledBack {
                    plan: pending.plan,
                    error: format!("{err:#}"),
                }
            }
        }
    }

    /// Plan, patch, send and settle one drop.
    pub async fn drop_task(
        &mut self,
        task_id: &str,
        target: &DropTarget,
    ) -> Result<DropOutcome, BoardError> {
        let Some(pending) = self.begin_drop(task_id, target)? else {
            return Ok(DropOutcome::Unchanged);
        };
        let result = self.dispatch(&pending).await;
        Ok(self.settle(pending, result))
    }

    pub async fn create_task(&mut self, input: CreateTaskInput) -> anyhow::Result<Task> {
        let task = self.api.create_task(input).await?;
        self.refresh().await?;
        Ok(task)
    }

    pub async fn update_task(&mut self, id: &str, input: UpdateTaskInput) -> anyhow::Result<Task> {
        let task = self.api.update_task(id, input).await?;
        self.refresh().await?;
        Ok(task)
    }

    pub async fn move_task(&mut self, id: &str, input: MoveTaskInput) -> anyhow::Result<Task> {
        let task = self.api.move_task(id, input).await?;
        self.refresh().await?;
        Ok(task)
    }

    pub async fn delete_task(&mut self, id: &str) -> anyhow::Result<()> {
        self.api.delete_task(id).await?;
        self.refresh().await?;
        Ok(())
    }

    pub async fn add_comment(
        &mut self,
        task_id: &str,
        input: AddCommentInput,
    ) -> anyhow::Result<Comment> {
        let comment = self.api.add_comment(task_id, input).await?;
        self.refresh().await?;
        Ok(comment)
    }

    pub async fn delete_comment(&mut self, task_id: &str, comment_id: &str) -> anyhow::Result<()> {
        self.api.delete_comment(task_id, comment_id).await?;
        self.refresh().await?;
        Ok(())
    }

    pub async fn list_comments(&self, task_id: &str) -> anyhow::Result<Vec<Comment>> {
        self.api.list_comments(task_id).await
    }

    pub async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        self.api.list_users().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::task;
    use crate::model::{Column, ReorderEntry};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockBoard {
        tasks: Mutex<Vec<Task>>,
        reorders: Mutex<Vec<Vec<ReorderEntry>>>,
        list_calls: Mutex<usize>,
        reject_reorder: AtomicBool,
    }

    impl MockBoard {
        fn with(tasks: Vec<Task>) -> Arc<Self> {
            Arc::new(Self {
                tasks: Mutex::new(tasks),
                ..Default::default()
            })
        }

        fn reorder_calls(&self) -> usize {
            self.reorders.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl BoardApi for MockBoard {
        fn name(&self) -> &str {
            "mock"
        }

        async fn list_tasks(&self) -> anyhow::Result<Vec<Task>> {
            *self.list_calls.lock().unwrap() += 1;
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn get_task(&self, id: &str) -> anyhow::Result<Task> {
            self.tasks
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(|| BoardError::task_not_found(id).into())
        }

        async fn create_task(&self, input: CreateTaskInput) -> anyhow::Result<Task> {
            let mut tasks = self.tasks.lock().unwrap();
            let column = input.column.unwrap_or_default();
            let position = tasks.iter().filter(|t| t.column == column).count() as u32;
            let created = task(&format!("t{}", tasks.len()), &input.title, column, position);
            tasks.push(created.clone());
            Ok(created)
        }

        async fn update_task(&self, _id: &str, _input: UpdateTaskInput) -> anyhow::Result<Task> {
            anyhow::bail!("not used")
        }

        async fn move_task(&self, _id: &str, _input: MoveTaskInput) -> anyhow::Result<Task> {
            anyhow::bail!("not used")
        }

        async fn reorder_tasks(&self, entries: Vec<ReorderEntry>) -> anyhow::Result<()> {
            self.reorders.lock().unwrap().push(entries.clone());
            if self.reject_reorder.load(Ordering::SeqCst) {
                anyhow::bail!(BoardError::TransactionFailure("disk full".into()));
            }
            let mut tasks = self.tasks.lock().unwrap();
            for entry in entries {
                if let Some(t) = tasks.iter_mut().find(|t| t.id == entry.id) {
                    t.column = entry.column;
                    t.position = entry.position;
                }
            }
            Ok(())
        }

        async fn delete_task(&self, id: &str) -> anyhow::Result<()> {
            self.tasks.lock().unwrap().retain(|t| t.id != id);
            Ok(())
        }

        async fn list_comments(&self, _task_id: &str) -> anyhow::Result<Vec<Comment>> {
            Ok(Vec::new())
        }

        async fn add_comment(
            &self,
            _task_id: &str,
            _input: AddCommentInput,
        ) -> anyhow::Result<Comment> {
            anyhow::bail!("not used")
        }

        async fn delete_comment(&self, _task_id: &str, _comment_id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn list_users(&self) -> anyhow::Result<Vec<User>> {
            Ok(Vec::new())
        }
    }

    fn todo_xyz() -> Vec<Task> {
        vec![
            task("x", "X", Column::Todo, 0),
            task("y", "Y", Column::Todo, 1),
            task("z", "Z", Column::Todo, 2),
            task("b", "B", Column::Backlog, 0),
        ]
    }

    async fn controller(api: &Arc<MockBoard>) -> ReorderController<MockBoard> {
        let mut ctl = ReorderController::new(api.clone());
        ctl.refresh().await.unwrap();
        ctl
    }

    fn titles(ctl: &ReorderController<MockBoard>, column: Column) -> Vec<String> {
        ctl.projection(&BoardSettings::default())
            .titles(column)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_drop_applies_and_sends_batch() {
        let api = MockBoard::with(todo_xyz());
        let mut ctl = controller(&api).await;

        let outcome = ctl
            .drop_task("z", &DropTarget::Task("x".into()))
            .await
            .unwrap();
        assert!(matches!(outcome, DropOutcome::Applied(_)));
        assert_eq!(titles(&ctl, Column::Todo), vec!["Z", "X", "Y"]);
        assert_eq!(api.reorder_calls(), 1);
        assert_eq!(ctl.cache().pending_patches(), 0);
    }

    #[tokio::test]
    async fn test_noop_drop_sends_nothing() {
        let api = MockBoard::with(todo_xyz());
        let mut ctl = controller(&api).await;
        let before = ctl.tasks().to_vec();

        let outcome = ctl
            .drop_task("y", &DropTarget::Task("y".into()))
            .await
            .unwrap();
        assert_eq!(outcome, DropOutcome::Unchanged);
        assert_eq!(api.reorder_calls(), 0);
        assert_eq!(ctl.tasks(), before.as_slice());
    }

    #[tokio::test]
    async fn test_rejected_drop_restores_cache_exactly() {
        let api = MockBoard::with(todo_xyz());
        api.reject_reorder.store(true, Ordering::SeqCst);
        let mut ctl = controller(&api).await;
        let before = ctl.tasks().to_vec();

        let outcome = ctl
            .drop_task("x", &DropTarget::Column(Column::Backlog))
            .await
            .unwrap();
        match outcome {
            DropOutcome::RolledBack { error, plan } => {
                assert!(error.contains("disk full"));
                assert_eq!(plan.to.column, Column::Backlog);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(ctl.tasks(), before.as_slice());
        assert_eq!(api.reorder_calls(), 1);
    }

    #[tokio::test]
    async fn test_second_drop_composes_on_patched_cache() {
        let api = MockBoard::with(todo_xyz());
        let mut ctl = controller(&api).await;

        let first = ctl
            .begin_drop("z", &DropTarget::Task("x".into()))
            .unwrap()
            .unwrap();
        let second = ctl
            .begin_drop("b", &DropTarget::Task("z".into()))
            .unwrap()
            .unwrap();
        // z now heads Todo, so b lands in front of it
        assert_eq!(titles(&ctl, Column::Todo), vec!["B", "Z", "X", "Y"]);

        let first_result = ctl.dispatch(&first).await;
        let second_result = ctl.dispatch(&second).await;
        ctl.settle(first, first_result);
        ctl.settle(second, second_result);

        ctl.refresh().await.unwrap();
        assert_eq!(titles(&ctl, Column::Todo), vec!["B", "Z", "X", "Y"]);
        assert!(ctl.cache().column(Column::Backlog).is_empty());
    }

    #[tokio::test]
    async fn test_failed_first_drop_keeps_independent_second() {
        let api = MockBoard::with(todo_xyz());
        let mut ctl = controller(&api).await;

        let first = ctl
            .begin_drop("z", &DropTarget::Task("x".into()))
            .unwrap()
            .unwrap();
        let second = ctl
            .begin_drop("b", &DropTarget::Column(Column::Done))
            .unwrap()
            .unwrap();

        ctl.settle(first, Err(anyhow::anyhow!("network down")));
        ctl.settle(second, Ok(()));

        assert_eq!(titles(&ctl, Column::Todo), vec!["X", "Y", "Z"]);
        assert_eq!(titles(&ctl, Column::Done), vec!["B"]);
    }

    #[tokio::test]
    async fn test_create_refetches_collection() {
        let api = MockBoard::with(todo_xyz());
        let mut ctl = controller(&api).await;

        let created = ctl
            .create_task(CreateTaskInput {
                title: "New".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.column, Column::Backlog);
        assert_eq!(created.position, 1);
        assert_eq!(*api.list_calls.lock().unwrap(), 2);
        assert_eq!(titles(&ctl, Column::Backlog), vec!["B", "New"]);
        assert_eq!(ctl.stats().total_tasks, 5);
    }

    #[tokio::test]
    async fn test_unknown_task_is_not_found() {
        let api = MockBoard::with(todo_xyz());
        let mut ctl = controller(&api).await;
        let err = ctl
            .drop_task("ghost", &DropTarget::Column(Column::Done))
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::NotFound { .. }));
        assert_eq!(api.reorder_calls(), 0);
    }
}
