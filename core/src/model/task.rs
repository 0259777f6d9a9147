use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::column::Column;
use crate::error::BoardError;

/// Enumerated task tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    App,
    Api,
    Db,
    Devops,
}

impl Tag {
    pub const ALL: [Tag; 4] = [Tag::App, Tag::Api, Tag::Db, Tag::Devops];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Api => "api",
            Self::Db => "db",
            Self::Devops => "devops",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "app" => Ok(Self::App),
            "api" => Ok(Self::Api),
            "db" => Ok(Self::Db),
            "devops" => Ok(Self::Devops),
            other => Err(BoardError::Validation(format!("unknown tag '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: User,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A fully hydrated task as returned by `listTasks`.
///
/// `position` is the zero-based rank inside `column`; across all tasks sharing a
/// column the positions form the dense sequence `0..count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "state")]
    pub column: Column,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn placement(&self) -> Placement {
        Placement {
            column: self.column,
            position: self.position,
        }
    }

    pub fn has_any_tag(&self, tags: &[Tag]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }
}

/// Where a task sits on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub column: Column,
    pub position: u32,
}

/// One `(task, column, position)` assignment of a reorder batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: String,
    #[serde(rename = "state")]
    pub column: Column,
    pub position: u32,
}

impl ReorderEntry {
    pub fn new(id: impl Into<String>, column: Column, position: u32) -> Self {
        Self {
            id: id.into(),
            column,
            position,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "state", default, skip_serializing_if = "Option::is_none")]
    pub column: Option<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<String>>,
}

/// Field-level edit. Never carries column or position: those only change through
/// the move and reorder paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<String>>,
}

impl UpdateTaskInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.assignee_ids.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTaskInput {
    #[serde(rename = "state")]
    pub column: Column,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentInput {
    pub author_id: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_wire_shape_uses_state_and_camel_case() {
        let json = r#"{
            "id":"t1","title":"X","description":"","state":"Todo","tags":["api","db"],
            "assignees":[{"id":"u1","name":"Alice","avatarUrl":"https://a"}],
            "comments":[],"position":2,
            "createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.column, Column::Todo);
        assert_eq!(task.tags, vec![Tag::Api, Tag::Db]);
        assert_eq!(task.assignees[0].avatar_url, "https://a");
        assert_eq!(task.placement().position, 2);

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["state"], "Todo");
        assert!(back.get("createdAt").is_some());
    }

    #[test]
    fn test_create_input_omits_unset_fields() {
        let input = CreateTaskInput {
            title: "Write docs".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(json, r#"{"title":"Write docs"}"#);
    }

    #[test]
    fn test_reorder_entry_serializes_column_as_state() {
        let entry = ReorderEntry::new("t1", Column::Done, 0);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"id":"t1","state":"Done","position":0}"#);
    }

    #[test]
    fn test_tag_parse_rejects_unknown() {
        assert_eq!("DevOps".parse::<Tag>().unwrap(), Tag::Devops);
        assert!(matches!(
            "frontend".parse::<Tag>(),
            Err(BoardError::Validation(_))
        ));
    }
}
