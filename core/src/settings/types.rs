use serde::{Deserialize, Serialize};

use crate::model::{Column, Tag};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Position order; the direction toggle does not apply.
    #[default]
    Manual,
    Title,
    CreatedAt,
    AssigneeCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSettings {
    #[serde(default)]
    pub field: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSettings {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Manual mode always reads ascending by position.
    pub fn effective_direction(&self) -> SortDirection {
        match self.field {
            SortField::Manual => SortDirection::Asc,
            _ => self.direction,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSettings {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub collapsed_columns: Vec<Column>,
    #[serde(default)]
    pub hidden_columns: Vec<Column>,
}

impl FilterSettings {
    pub fn with_tags(tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn is_hidden(&self, column: Column) -> bool {
        self.hidden_columns.contains(&column)
    }

    pub fn is_collapsed(&self, column: Column) -> bool {
        self.collapsed_columns.contains(&column)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSettings {
    #[serde(default)]
    pub filters: FilterSettings,
    #[serde(default)]
    pub sorting: SortSettings,
    #[serde(default)]
    pub theme: Theme,
}
