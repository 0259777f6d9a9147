//! Client copy of the task collection with undoable placement patches.

use crate::model::{Column, Placement, ReorderEntry, Task};

use super::plan::column_order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchId(u64);

#[derive(Debug, Clone)]
struct Inverse {
    id: PatchId,
    prior: Vec<(String, Placement)>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskCache {
    tasks: Vec<Task>,
    pending: Vec<Inverse>,
    next_patch: u64,
}

impl TaskCache {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn column(&self, column: Column) -> Vec<&Task> {
        column_order(&self.tasks, column)
    }

    pub fn pending_patches(&self) -> usize {
        self.pending.len()
    }

    /// Swap in a fresh server snapshot. Outstanding patches are forgotten.
    pub fn replace(&mut self, tasks: Vec<Task>) {
        if !self.pending.is_empty() {
            tracing::debug!(
                target: "taskboard.cache",
                dropped = self.pending.len(),
                "replacing cache with pending patches"
            );
        }
        self.tasks = tasks;
        self.pending.clear();
    }

    /// Write every entry's placement into the cache and remember what it overwrote.
    /// Entries naming unknown ids are skipped.
    pub fn apply(&mut self, batch: &[ReorderEntry]) -> PatchId {
        let id = PatchId(self.next_patch);
        self.next_patch += 1;

        let mut prior: Vec<(String, Placement)> = Vec::with_capacity(batch.len());
        for entry in batch {
            let Some(task) = self.tasks.iter_mut().find(|t| t.id == entry.id) else {
                continue;
            };
            if !prior.iter().any(|(seen, _)| *seen == entry.id) {
                prior.push((entry.id.clone(), task.placement()));
            }
            task.column = entry.column;
            task.position = entry.position;
        }

        self.pending.push(Inverse { id, prior });
        id
    }

    /// Keep the patch. Returns false when the id is not pending.
    ///
    /// Older pending patches stop tracking every task this one wrote, so undoing
    /// them later cannot overwrite the confirmed placement.
    pub fn commit(&mut self, patch: PatchId) -> bool {
        let Some((index, inverse)) = self.take(patch) else {
            return false;
        };
        for older in &mut self.pending[..index] {
            older
                .prior
                .retain(|(id, _)| !inverse.prior.iter().any(|(confirmed, _)| confirmed == id));
        }
        true
    }

    /// Revert the patch.
    ///
    /// A record that a later pending patch also wrote keeps the later value; the
    /// later patch inherits the restored prior so undoing it afterwards still lands
    /// on the state before both.
    pub fn undo(&mut self, patch: PatchId) -> bool {
        let Some((index, inverse)) = self.take(patch) else {
            return false;
        };

        for (task_id, placement) in inverse.prior {
            let later = self.pending[index..]
                .iter_mut()
                .find_map(|p| p.prior.iter_mut().find(|(id, _)| *id == task_id));
            match later {
                Some((_, inherited)) => *inherited = placement,
                None => {
                    if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                        task.column = placement.column;
                        task.position = placement.position;
                    }
                }
            }
        }
        true
    }

    fn take(&mut self, patch: PatchId) -> Option<(usize, Inverse)> {
        let index = self.pending.iter().position(|p| p.id == patch)?;
        Some((index, self.pending.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::task;
    use pretty_assertions::assert_eq;

    fn board() -> Vec<Task> {
        vec![
            task("a", "A", Column::Backlog, 0),
            task("b", "B", Column::Backlog, 1),
            task("x", "X", Column::Todo, 0),
            task("y", "Y", Column::Todo, 1),
        ]
    }

    fn ids(cache: &TaskCache, column: Column) -> Vec<&str> {
        cache.column(column).iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_apply_then_undo_restores_exact_snapshot() {
        let mut cache = TaskCache::new(board());
        let before = cache.tasks().to_vec();

        let patch = cache.apply(&[
            ReorderEntry::new("b", Column::Backlog, 0),
            ReorderEntry::new("x", Column::Backlog, 1),
            ReorderEntry::new("a", Column::Backlog, 2),
            ReorderEntry::new("y", Column::Todo, 0),
        ]);
        assert_eq!(ids(&cache, Column::Backlog), vec!["b", "x", "a"]);

        assert!(cache.undo(patch));
        assert_eq!(cache.tasks(), before.as_slice());
        assert_eq!(cache.pending_patches(), 0);
    }

    #[test]
    fn test_commit_keeps_patch_and_forgets_inverse() {
        let mut cache = TaskCache::new(board());
        let patch = cache.apply(&[
            ReorderEntry::new("y", Column::Todo, 0),
            ReorderEntry::new("x", Column::Todo, 1),
        ]);
        assert!(cache.commit(patch));
        assert!(!cache.undo(patch));
        assert_eq!(ids(&cache, Column::Todo), vec!["y", "x"]);
    }

    #[test]
    fn test_undo_first_keeps_later_independent_patch() {
        let mut cache = TaskCache::new(board());
        let first = cache.apply(&[
            ReorderEntry::new("b", Column::Backlog, 0),
            ReorderEntry::new("a", Column::Backlog, 1),
        ]);
        let second = cache.apply(&[
            ReorderEntry::new("y", Column::Todo, 0),
            ReorderEntry::new("x", Column::Todo, 1),
        ]);

        assert!(cache.undo(first));
        assert_eq!(ids(&cache, Column::Backlog), vec!["a", "b"]);
        assert_eq!(ids(&cache, Column::Todo), vec!["y", "x"]);
        assert!(cache.commit(second));
    }

    #[test]
    fn test_overlapping_patches_unwind_in_any_order() {
        let mut cache = TaskCache::new(board());
        let before = cache.tasks().to_vec();

        let first = cache.apply(&[
            ReorderEntry::new("b", Column::Backlog, 0),
            ReorderEntry::new("a", Column::Backlog, 1),
        ]);
        let second = cache.apply(&[
            ReorderEntry::new("b", Column::Backlog, 0),
            ReorderEntry::new("a", Column::Todo, 0),
            ReorderEntry::new("x", Column::Todo, 1),
            ReorderEntry::new("y", Column::Todo, 2),
        ]);

        // the later write survives until its own patch is undone
        assert!(cache.undo(first));
        assert_eq!(cache.get("a").unwrap().column, Column::Todo);

        assert!(cache.undo(second));
        assert_eq!(cache.tasks(), before.as_slice());
    }

    #[test]
    fn test_undo_after_later_overlapping_commit_keeps_confirmed_order() {
        let mut cache = TaskCache::new(vec![
            task("b", "B", Column::Backlog, 0),
            task("x", "X", Column::Todo, 0),
            task("y", "Y", Column::Todo, 1),
            task("z", "Z", Column::Todo, 2),
        ]);

        let first = cache.apply(&[
            ReorderEntry::new("z", Column::Todo, 0),
            ReorderEntry::new("x", Column::Todo, 1),
            ReorderEntry::new("y", Column::Todo, 2),
        ]);
        let second = cache.apply(&[
            ReorderEntry::new("b", Column::Todo, 0),
            ReorderEntry::new("z", Column::Todo, 1),
            ReorderEntry::new("x", Column::Todo, 2),
            ReorderEntry::new("y", Column::Todo, 3),
        ]);

        assert!(cache.commit(second));
        assert!(cache.undo(first));

        assert_eq!(ids(&cache, Column::Todo), vec!["b", "z", "x", "y"]);
        let positions: Vec<u32> = cache.column(Column::Todo).iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
        assert!(ids(&cache, Column::Backlog).is_empty());
        assert_eq!(cache.pending_patches(), 0);
    }

    #[test]
    fn test_replace_discards_pending() {
        let mut cache = TaskCache::new(board());
        let patch = cache.apply(&[ReorderEntry::new("a", Column::Done, 0)]);
        cache.replace(board());
        assert_eq!(cache.pending_patches(), 0);
        assert!(!cache.undo(patch));
        assert_eq!(cache.get("a").unwrap().column, Column::Backlog);
    }

    #[test]
    fn test_unknown_entries_are_skipped() {
        let mut cache = TaskCache::new(board());
        let before = cache.tasks().to_vec();
        let patch = cache.apply(&[ReorderEntry::new("ghost", Column::Done, 0)]);
        assert_eq!(cache.tasks(), before.as_slice());
        assert!(cache.undo(patch));
        assert_eq!(cache.tasks(), before.as_slice());
    }
}
