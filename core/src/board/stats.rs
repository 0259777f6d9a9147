use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{Column, Task};

/// Board-wide counters shown in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total_tasks: usize,
    pub by_column: BTreeMap<Column, usize>,
    pub completed_percent: u32,
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let mut by_column: BTreeMap<Column, usize> = Column::ALL.iter().map(|c| (*c, 0)).collect();
    for task in tasks {
        *by_column.entry(task.column).or_insert(0) += 1;
    }

    let total_tasks = tasks.len();
    let done = by_column.get(&Column::Done).copied().unwrap_or(0);
    let completed_percent = if total_tasks == 0 {
        0
    } else {
        ((done as f64 / total_tasks as f64) * 100.0).round() as u32
    };

    TaskStats {
        total_tasks,
        by_column,
        completed_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::task;

    #[test]
    fn test_empty_board_is_zero_percent() {
        let stats = task_stats(&[]);
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.completed_percent, 0);
        assert_eq!(stats.by_column.len(), 4);
    }

    #[test]
    fn test_counts_and_rounds_percent() {
        let tasks = vec![
            task("1", "a", Column::Backlog, 0),
            task("2", "b", Column::Done, 0),
            task("3", "c", Column::Done, 1),
        ];
        let stats = task_stats(&tasks);
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.by_column[&Column::Done], 2);
        assert_eq!(stats.by_column[&Column::Todo], 0);
        assert_eq!(stats.completed_percent, 67);
    }
}
