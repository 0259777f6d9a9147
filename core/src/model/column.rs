use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;

/// One of the four fixed board columns.
///
/// The derived `Ord` follows the display order (Backlog, Todo, InProgress, Done),
/// which is unrelated to task positions inside a column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Column {
    #[default]
    Backlog,
    Todo,
    InProgress,
    Done,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Backlog,
        Column::Todo,
        Column::InProgress,
        Column::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::Todo => "Todo",
            Self::InProgress => "InProgress",
            Self::Done => "Done",
        }
    }

    /// Human label used by terminal output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    pub fn display_index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "todo" => Ok(Self::Todo),
            "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(BoardError::Validation(format!("unknown column '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_order_matches_ord() {
        let mut shuffled = vec![Column::Done, Column::Backlog, Column::InProgress, Column::Todo];
        shuffled.sort();
        assert_eq!(shuffled, Column::ALL.to_vec());
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_separators() {
        assert_eq!("in-progress".parse::<Column>().unwrap(), Column::InProgress);
        assert_eq!("InProgress".parse::<Column>().unwrap(), Column::InProgress);
        assert_eq!("TODO".parse::<Column>().unwrap(), Column::Todo);
        assert!("archived".parse::<Column>().is_err());
    }

    #[test]
    fn test_wire_name_round_trips_through_serde() {
        let json = serde_json::to_string(&Column::InProgress).unwrap();
        assert_eq!(json, "\"InProgress\"");
    }
}
