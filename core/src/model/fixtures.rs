//! Task builders shared by unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{Column, Tag, Task, User};

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

/// A task whose creation time is `epoch + position minutes` unless overridden.
pub fn task(id: &str, title: &str, column: Column, position: u32) -> Task {
    let created_at = epoch() + Duration::minutes(i64::from(position));
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        column,
        tags: Vec::new(),
        assignees: Vec::new(),
        comments: Vec::new(),
        position,
        created_at,
        updated_at: created_at,
    }
}

pub fn with_tags(mut task: Task, tags: &[Tag]) -> Task {
    task.tags = tags.to_vec();
    task
}

pub fn with_assignees(mut task: Task, count: usize) -> Task {
    task.assignees = (0..count)
        .map(|i| User {
            id: format!("u{i}"),
            name: format!("User {i}"),
            avatar_url: String::new(),
        })
        .collect();
    task
}

pub fn created_minutes_after_epoch(mut task: Task, minutes: i64) -> Task {
    task.created_at = epoch() + Duration::minutes(minutes);
    task
}
