//! HTTP API数据模型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use taskboard_core::api::{BoardError, Column, CreateTaskInput, Tag};
use taskboard_plugins::store::StoreError;

// ============= Tasks =============

/// `POST /api/tasks`. A missing title deserializes as empty and is rejected by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "state", default)]
    pub column: Option<Column>,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
    #[serde(default)]
    pub assignee_ids: Option<Vec<String>>,
}

impl From<CreateTaskRequest> for CreateTaskInput {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            column: req.column,
            tags: req.tags,
            assignee_ids: req.assignee_ids,
        }
    }
}

/// `PATCH /api/tasks/:id/move`. Signed so a negative index reaches validation
/// instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    pub state: Column,
    pub position: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderItem {
    pub id: String,
    pub state: Column,
    pub position: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReorderRequest {
    #[serde(default)]
    pub tasks: Vec<ReorderItem>,
}

// ============= Comments =============

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub text: String,
}

// ============= Ack / Health =============

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: f64,
    pub requests_handled: u64,
    pub errors_total: u64,
    pub timestamp: String,
}

// ============= Error Handling =============

#[derive(Debug)]
pub enum HttpServerError {
    Board(BoardError),
    Internal(String),
}

impl From<BoardError> for HttpServerError {
    fn from(err: BoardError) -> Self {
        Self::Board(err)
    }
}

impl From<StoreError> for HttpServerError {
    fn from(err: StoreError) -> Self {
        Self::Board(err.into())
    }
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "success": false });

        let status = match &self {
            Self::Board(err) => {
                body["error"] = err.to_string().into();
                body["error_code"] = err.error_code().as_str().into();
                match err {
                    BoardError::NotFound { kind, id } => {
                        body["entity"] = kind.to_string().into();
                        body["entity_id"] = id.clone().into();
                        StatusCode::NOT_FOUND
                    }
                    BoardError::Validation(_) => StatusCode::BAD_REQUEST,
                    BoardError::TransactionFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
            Self::Internal(msg) => {
                body["error"] = msg.clone().into();
                body["error_code"] = "INTERNAL_ERROR".into();
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn envelope(err: HttpServerError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"title":"Ship it"}"#).unwrap();
        assert_eq!(req.title, "Ship it");
        assert!(req.column.is_none());

        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"state":"Done","assigneeIds":["u1"]}"#).unwrap();
        assert_eq!(req.title, "");
        assert_eq!(req.column, Some(Column::Done));
        assert_eq!(req.assignee_ids, Some(vec!["u1".to_string()]));
    }

    #[test]
    fn test_move_request_accepts_negative_position() {
        let req: MoveTaskRequest =
            serde_json::from_str(r#"{"state":"InProgress","position":-1}"#).unwrap();
        assert_eq!(req.state, Column::InProgress);
        assert_eq!(req.position, -1);
    }

    #[tokio::test]
    async fn test_not_found_envelope_names_entity() {
        let (status, body) =
            envelope(HttpServerError::Board(BoardError::task_not_found("t9"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "NOT_FOUND");
        assert_eq!(body["entity"], "task");
        assert_eq!(body["entity_id"], "t9");
    }

    #[tokio::test]
    async fn test_validation_and_internal_envelopes() {
        let (status, body) =
            envelope(HttpServerError::Board(BoardError::validation("title is required"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "INVALID_REQUEST");
        assert_eq!(body["error"], "validation failed: title is required");
        assert!(body.get("entity").is_none());

        let (status, body) = envelope(HttpServerError::Internal("boom".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error_code"], "INTERNAL_ERROR");
    }
}
