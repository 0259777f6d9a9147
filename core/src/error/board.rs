use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which kind of record an id failed to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Task,
    User,
    Comment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Task => "task",
            Self::User => "user",
            Self::Comment => "comment",
        })
    }
}

/// Stable codes carried in error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    InvalidRequest,
    TransactionFailed,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::TransactionFailed => "TRANSACTION_FAILED",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "NOT_FOUND" => Some(Self::NotFound),
            "INVALID_REQUEST" => Some(Self::InvalidRequest),
            "TRANSACTION_FAILED" => Some(Self::TransactionFailed),
            _ => None,
        }
    }
}

/// Failure taxonomy shared by the store, the HTTP layer and the client.
///
/// Every variant leaves persisted state untouched: validation runs before any
/// write, and a transaction failure rolls back the whole unit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("transaction failed: {0}")]
    TransactionFailure(String),
}

impl BoardError {
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Task,
            id: id.into(),
        }
    }

    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::User,
            id: id.into(),
        }
    }

    pub fn comment_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Comment,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Validation(_) => ErrorCode::InvalidRequest,
            Self::TransactionFailure(_) => ErrorCode::TransactionFailed,
        }
    }
}
