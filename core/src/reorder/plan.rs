//! Position assignments implied by a single drop.

use crate::error::BoardError;
use crate::model::{Column, Placement, ReorderEntry, Task};

/// Where the dragged task was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty area of a column: append at the end.
    Column(Column),
    /// On top of another task: take that task's column and index.
    Task(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub task_id: String,
    pub from: Placement,
    pub to: Placement,
    /// Every task whose (column, position) is restated by this drop, source column first.
    pub batch: Vec<ReorderEntry>,
}

impl ReorderPlan {
    pub fn is_cross_column(&self) -> bool {
        self.from.column != self.to.column
    }
}

/// Tasks of `column` in manual order (position, then creation time, then id).
pub fn column_order(tasks: &[Task], column: Column) -> Vec<&Task> {
    let mut out: Vec<&Task> = tasks.iter().filter(|t| t.column == column).collect();
    out.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    out
}

/// Compute the reorder batch for dropping `task_id` on `target`.
///
/// Column lists are the complete manual order of each column, independent of any
/// view filter, so the batch renumbers every sibling densely. Returns `None` when
/// the dragged task would keep its current column and position.
pub fn plan_drop(
    tasks: &[Task],
    task_id: &str,
    target: &DropTarget,
) -> Result<Option<ReorderPlan>, BoardError> {
    let dragged = tasks
        .iter()
        .find(|t| t.id == task_id)
        .ok_or_else(|| BoardError::task_not_found(task_id))?;

    let (dest_column, target_index) = match target {
        DropTarget::Column(column) => (*column, column_order(tasks, *column).len()),
        DropTarget::Task(over_id) => {
            let over = tasks
                .iter()
                .find(|t| &t.id == over_id)
                .ok_or_else(|| BoardError::task_not_found(over_id.as_str()))?;
            let order = column_order(tasks, over.column);
            let index = order
                .iter()
                .position(|t| t.id == over.id)
                .unwrap_or(order.len());
            (over.column, index)
        }
    };

    let from = dragged.placement();
    let source_ids = ids_of(&column_order(tasks, from.column));

    if from.column == dest_column {
        let mut ids = without(&source_ids, task_id);
        let at = target_index.min(ids.len());
        ids.insert(at, task_id);
        let to = Placement {
            column: dest_column,
            position: at as u32,
        };
        if to == from {
            return Ok(None);
        }
        return Ok(Some(ReorderPlan {
            task_id: task_id.to_string(),
            from,
            to,
            batch: renumber(&ids, dest_column),
        }));
    }

    let remaining = without(&source_ids, task_id);
    let mut dest_ids = ids_of(&column_order(tasks, dest_column));
    let at = target_index.min(dest_ids.len());
    dest_ids.insert(at, task_id);

    let mut batch = renumber(&remaining, from.column);
    batch.extend(renumber(&dest_ids, dest_column));

    Ok(Some(ReorderPlan {
        task_id: task_id.to_string(),
        from,
        to: Placement {
            column: dest_column,
            position: at as u32,
        },
        batch,
    }))
}

fn ids_of<'a>(tasks: &[&'a Task]) -> Vec<&'a str> {
    tasks.iter().map(|t| t.id.as_str()).collect()
}

fn without<'a>(ids: &[&'a str], id: &str) -> Vec<&'a str> {
    ids.iter().copied().filter(|i| *i != id).collect()
}

fn renumber(ids: &[&str], column: Column) -> Vec<ReorderEntry> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| ReorderEntry::new(*id, column, i as u32))
        .collect()
}
