//! Plain-text rendering for terminal output.

use std::fmt::Write as _;
use taskboard_core::api::{
    BoardSettings, Column, ColumnProjection, Comment, SortField, Task, TaskStats, User,
};

pub fn render_stats(stats: &TaskStats) -> String {
    let per_column = Column::ALL
        .iter()
        .map(|c| format!("{} {}", c.label(), stats.by_column.get(c).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join(" | ");
    format!(
        "{} tasks ({}% done)  {}",
        stats.total_tasks, stats.completed_percent, per_column
    )
}

/// Board view: one block per visible column, collapsed columns as a header only.
pub fn render_board(
    projection: &ColumnProjection,
    settings: &BoardSettings,
    stats: &TaskStats,
    visible: &[Column],
) -> String {
    let mut out = render_stats(stats);
    if !settings.filters.tags.is_empty() {
        let tags: Vec<_> = settings.filters.tags.iter().map(|t| t.as_str()).collect();
        let _ = write!(out, "\nfilter: {}", tags.join(", "));
    }
    if settings.sorting.field != SortField::Manual {
        let _ = write!(
            out,
            "\nsort: {:?} {:?}",
            settings.sorting.field,
            settings.sorting.effective_direction()
        );
    }

    for column in visible {
        let tasks = projection.column(*column);
        let _ = write!(out, "\n\n== {} ({}) ==", column.label(), tasks.len());
        if settings.filters.is_collapsed(*column) {
            out.push_str(" [collapsed]");
            continue;
        }
        if tasks.is_empty() {
            out.push_str("\n  (empty)");
        }
        for task in tasks {
            let _ = write!(out, "\n{}", render_task_line(task));
        }
    }
    out
}

pub fn render_task_line(task: &Task) -> String {
    let mut line = format!("  [{}] {}", task.position, task.title);
    for tag in &task.tags {
        let _ = write!(line, " #{tag}");
    }
    if !task.assignees.is_empty() {
        let names: Vec<_> = task.assignees.iter().map(|u| u.name.as_str()).collect();
        let _ = write!(line, "  @{}", names.join(", @"));
    }
    if !task.comments.is_empty() {
        let _ = write!(line, "  ({} comments)", task.comments.len());
    }
    let _ = write!(line, "  <{}>", task.id);
    line
}

pub fn render_task(task: &Task) -> String {
    let mut out = format!(
        "{}\n  id: {}\n  column: {} #{}",
        task.title,
        task.id,
        task.column.label(),
        task.position
    );
    if !task.description.is_empty() {
        let _ = write!(out, "\n  description: {}", task.description);
    }
    if !task.tags.is_empty() {
        let tags: Vec<_> = task.tags.iter().map(|t| t.as_str()).collect();
        let _ = write!(out, "\n  tags: {}", tags.join(", "));
    }
    if !task.assignees.is_empty() {
        let names: Vec<_> = task.assignees.iter().map(|u| u.name.as_str()).collect();
        let _ = write!(out, "\n  assignees: {}", names.join(", "));
    }
    let _ = write!(
        out,
        "\n  created: {}  updated: {}",
        task.created_at.format("%Y-%m-%d %H:%M"),
        task.updated_at.format("%Y-%m-%d %H:%M")
    );
    if !task.comments.is_empty() {
        out.push('\n');
        out.push_str(&render_comments(&task.comments));
    }
    out
}

pub fn render_comments(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "no comments".to_string();
    }
    comments
        .iter()
        .map(|c| {
            format!(
                "  {} {}: {}  <{}>",
                c.created_at.format("%Y-%m-%d"),
                c.author.name,
                c.text,
                c.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_users(users: &[User]) -> String {
    users
        .iter()
        .map(|u| format!("{}  <{}>", u.name, u.id))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_settings(settings: &BoardSettings) -> String {
    let list = |columns: &[Column]| {
        if columns.is_empty() {
            "-".to_string()
        } else {
            columns.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
        }
    };
    let tags = if settings.filters.tags.is_empty() {
        "-".to_string()
    } else {
        settings
            .filters
            .tags
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "tags: {tags}\ncollapsed: {}\nhidden: {}\nsort: {:?} {:?}\ntheme: {:?}",
        list(&settings.filters.collapsed_columns),
        list(&settings.filters.hidden_columns),
        settings.sorting.field,
        settings.sorting.direction,
        settings.theme
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use taskboard_core::api::{project, task_stats, visible_columns, Tag};

    fn task(id: &str, title: &str, column: Column, position: u32) -> Task {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        Task {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            column,
            tags: Vec::new(),
            assignees: Vec::new(),
            comments: Vec::new(),
            position,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_task_line_lists_tags_and_assignees() {
        let mut t = task("t1", "Wire API", Column::Todo, 2);
        t.tags = vec![Tag::Api, Tag::Db];
        t.assignees = vec![User {
            id: "u1".into(),
            name: "Alice Chen".into(),
            avatar_url: String::new(),
        }];
        assert_eq!(render_task_line(&t), "  [2] Wire API #api #db  @Alice Chen  <t1>");
    }

    #[test]
    fn test_board_hides_and_collapses_columns() {
        let tasks = vec![
            task("a", "A", Column::Backlog, 0),
            task("b", "B", Column::Todo, 0),
            task("c", "C", Column::Done, 0),
        ];
        let mut settings = BoardSettings::default();
        settings.filters.hidden_columns = vec![Column::InProgress];
        settings.filters.collapsed_columns = vec![Column::Todo];

        let projection = project(&tasks, &settings.filters, &settings.sorting);
        let visible = visible_columns(&settings.filters);
        let out = render_board(&projection, &settings, &task_stats(&tasks), &visible);

        assert!(out.starts_with("3 tasks (33% done)"));
        assert!(out.contains("== To Do (1) == [collapsed]"));
        assert!(!out.contains("[0] B"));
        assert!(!out.contains("== In Progress"));
        assert!(out.contains("[0] C"));
    }

    #[test]
    fn test_empty_comment_list() {
        assert_eq!(render_comments(&[]), "no comments");
    }
}
