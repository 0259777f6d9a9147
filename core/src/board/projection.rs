//! Per-column view derived from the flat task collection.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::{Column, Task};
use crate::settings::{FilterSettings, SortDirection, SortField, SortSettings};

/// Ordered, filtered task lists keyed by column. Every column is present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProjection {
    columns: BTreeMap<Column, Vec<Task>>,
}

impl ColumnProjection {
    pub fn column(&self, column: Column) -> &[Task] {
        self.columns
            .get(&column)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &[Task])> {
        self.columns.iter().map(|(c, tasks)| (*c, tasks.as_slice()))
    }

    pub fn titles(&self, column: Column) -> Vec<&str> {
        self.column(column).iter().map(|t| t.title.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Filter by tag, bucket by column, then sort each bucket.
///
/// Pure: the input slice is only read, and the result owns clones.
pub fn project(tasks: &[Task], filters: &FilterSettings, sorting: &SortSettings) -> ColumnProjection {
    let mut columns: BTreeMap<Column, Vec<Task>> =
        Column::ALL.iter().map(|c| (*c, Vec::new())).collect();

    let keep = |task: &Task| filters.tags.is_empty() || task.has_any_tag(&filters.tags);
    for task in tasks.iter().filter(|t| keep(t)) {
        columns.entry(task.column).or_default().push(task.clone());
    }

    let direction = sorting.effective_direction();
    for bucket in columns.values_mut() {
        bucket.sort_by(|a, b| compare_tasks(a, b, sorting.field, direction));
    }

    ColumnProjection { columns }
}

/// Columns shown on the board, in display order.
pub fn visible_columns(filters: &FilterSettings) -> Vec<Column> {
    Column::ALL
        .iter()
        .copied()
        .filter(|c| !filters.is_hidden(*c))
        .collect()
}

fn compare_tasks(a: &Task, b: &Task, field: SortField, direction: SortDirection) -> Ordering {
    let ord = match field {
        SortField::Manual => a.position.cmp(&b.position),
        SortField::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::AssigneeCount => a.assignees.len().cmp(&b.assignees.len()),
    };
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}
