use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::{error::Error as StdError, fmt};

use taskboard_core::api::{
    AddCommentInput, BoardApi, BoardError, Comment, CreateTaskInput, EntityKind, ErrorCode,
    MoveTaskInput, ReorderEntry, Task, UpdateTaskInput, User,
};

const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardHttpErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Status,
    Unknown,
}

impl BoardHttpErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BoardHttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct BoardHttpError {
    kind: BoardHttpErrorKind,
    status: Option<u16>,
    url: Option<String>,
    message: String,
    source: Option<anyhow::Error>,
}

impl BoardHttpError {
    pub fn kind(&self) -> BoardHttpErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn from_reqwest(err: reqwest::Error, url: String) -> Self {
        let kind = if err.is_timeout() {
            BoardHttpErrorKind::Timeout
        } else if err.is_connect() {
            BoardHttpErrorKind::Connect
        } else if err.is_request() {
            BoardHttpErrorKind::Request
        } else if err.is_body() {
            BoardHttpErrorKind::Body
        } else if err.is_decode() {
            BoardHttpErrorKind::Decode
        } else {
            BoardHttpErrorKind::Unknown
        };
        let status = err.status().map(|s| s.as_u16());
        let message = err.to_string();
        BoardHttpError {
            kind,
            status,
            url: Some(url),
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }

    fn status_error(status: u16, url: String, preview: String) -> Self {
        BoardHttpError {
            kind: BoardHttpErrorKind::Status,
            status: Some(status),
            url: Some(url),
            message: preview,
            source: None,
        }
    }

    fn decode_error(status: u16, url: String, err: serde_json::Error, preview: String) -> Self {
        let message = format!("failed to decode response body: {} | body={}", err, preview);
        BoardHttpError {
            kind: BoardHttpErrorKind::Decode,
            status: Some(status),
            url: Some(url),
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }
}

impl fmt::Display for BoardHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "board http error kind={}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for BoardHttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

/// Error envelope written by the board server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    error_code: Option<String>,
    entity: Option<EntityKind>,
    entity_id: Option<String>,
}

impl ErrorBody {
    /// The typed error the server reported, when the envelope carries enough to rebuild it.
    fn board_error(self) -> Option<BoardError> {
        match ErrorCode::parse(self.error_code.as_deref()?)? {
            ErrorCode::NotFound => Some(BoardError::NotFound {
                kind: self.entity?,
                id: self.entity_id?,
            }),
            ErrorCode::InvalidRequest => Some(BoardError::Validation(strip(
                &self.error,
                "validation failed: ",
            ))),
            ErrorCode::TransactionFailed => Some(BoardError::TransactionFailure(strip(
                &self.error,
                "transaction failed: ",
            ))),
        }
    }
}

fn strip(message: &str, prefix: &str) -> String {
    message.strip_prefix(prefix).unwrap_or(message).to_string()
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}

async fn parse_json_response<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| BoardHttpError::from_reqwest(err, url.clone()))?;

    if !status.is_success() {
        if let Some(board) = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::board_error)
        {
            return Err(anyhow::Error::new(board).context(format!("{} {}", status.as_u16(), url)));
        }
        let preview = preview_body(&body);
        return Err(BoardHttpError::status_error(status.as_u16(), url, preview).into());
    }

    serde_json::from_str::<T>(&body).map_err(|err| {
        let preview = preview_body(&body);
        BoardHttpError::decode_error(status.as_u16(), url, err, preview).into()
    })
}

#[derive(Debug, Deserialize)]
struct Ack {
    #[serde(default)]
    success: bool,
}

#[derive(Clone)]
pub struct BoardHttpClient {
    http: reqwest::Client,
    base_url: String,
    api_root: reqwest::Url,
    url_tasks: String,
    url_reorder: String,
    url_users: String,
}

impl BoardHttpClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        let normalized = base_url.trim_end_matches('/');
        let api_root = reqwest::Url::parse(normalized)?;
        let mut client = Self {
            http,
            base_url: normalized.to_string(),
            api_root,
            url_tasks: String::new(),
            url_reorder: String::new(),
            url_users: String::new(),
        };
        client.url_tasks = client.endpoint(&["api", "tasks"])?;
        client.url_reorder = client.endpoint(&["api", "tasks", "reorder"])?;
        client.url_users = client.endpoint(&["api", "users"])?;
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<String> {
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }

    fn task_url(&self, id: &str, tail: &[&str]) -> anyhow::Result<String> {
        let mut segments = vec!["api", "tasks", id];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
        stage: &'static str,
    ) -> anyhow::Result<T> {
        tracing::debug!(target: "taskboard.client", stage = stage, url = %url);
        let resp = req
            .send()
            .await
            .map_err(|err| BoardHttpError::from_reqwest(err, url.to_string()))?;
        let status = resp.status();
        let value = parse_json_response(resp).await?;
        tracing::debug!(target: "taskboard.client", stage = stage, status = %status, "done");
        Ok(value)
    }

    async fn send_ack(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
        stage: &'static str,
    ) -> anyhow::Result<()> {
        let ack: Ack = self.send(req, url, stage).await?;
        if !ack.success {
            anyhow::bail!("server did not acknowledge {stage} at {url}");
        }
        Ok(())
    }
}

#[async_trait]
impl BoardApi for BoardHttpClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_tasks(&self) -> anyhow::Result<Vec<Task>> {
        let url = &self.url_tasks;
        self.send(self.http.get(url), url, "client.tasks.list").await
    }

    async fn get_task(&self, id: &str) -> anyhow::Result<Task> {
        let url = self.task_url(id, &[])?;
        self.send(self.http.get(&url), &url, "client.tasks.get").await
    }

    async fn create_task(&self, input: CreateTaskInput) -> anyhow::Result<Task> {
        let url = &self.url_tasks;
        self.send(self.http.post(url).json(&input), url, "client.tasks.create")
            .await
    }

    async fn update_task(&self, id: &str, input: UpdateTaskInput) -> anyhow::Result<Task> {
        let url = self.task_url(id, &[])?;
        self.send(self.http.patch(&url).json(&input), &url, "client.tasks.update")
            .await
    }

    async fn move_task(&self, id: &str, input: MoveTaskInput) -> anyhow::Result<Task> {
        let url = self.task_url(id, &["move"])?;
        self.send(self.http.patch(&url).json(&input), &url, "client.tasks.move")
            .await
    }

    async fn reorder_tasks(&self, entries: Vec<ReorderEntry>) -> anyhow::Result<()> {
        let url = &self.url_reorder;
        tracing::debug!(
            target: "taskboard.client",
            stage = "client.tasks.reorder.in",
            count = entries.len()
        );
        let body = serde_json::json!({ "tasks": entries });
        self.send_ack(self.http.post(url).json(&body), url, "client.tasks.reorder")
            .await
    }

    async fn delete_task(&self, id: &str) -> anyhow::Result<()> {
        let url = self.task_url(id, &[])?;
        self.send_ack(self.http.delete(&url), &url, "client.tasks.delete")
            .await
    }

    async fn list_comments(&self, task_id: &str) -> anyhow::Result<Vec<Comment>> {
        let url = self.task_url(task_id, &["comments"])?;
        self.send(self.http.get(&url), &url, "client.comments.list")
            .await
    }

    async fn add_comment(
        &self,
        task_id: &str,
        input: AddCommentInput,
    ) -> anyhow::Result<Comment> {
        let url = self.task_url(task_id, &["comments"])?;
        self.send(self.http.post(&url).json(&input), &url, "client.comments.add")
            .await
    }

    async fn delete_comment(&self, task_id: &str, comment_id: &str) -> anyhow::Result<()> {
        let url = self.task_url(task_id, &["comments", comment_id])?;
        self.send_ack(self.http.delete(&url), &url, "client.comments.delete")
            .await
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        let url = &self.url_users;
        self.send(self.http.get(url), url, "client.users.list").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use taskboard_core::api::Column;

    const TASK_JSON: &str = r#"{
        "id": "t1",
        "title": "Design user dashboard",
        "description": "",
        "state": "Todo",
        "tags": ["app"],
        "position": 0,
        "createdAt": "2024-05-01T09:00:00Z",
        "updatedAt": "2024-05-01T09:00:00Z",
        "assignees": [{"id": "u1", "name": "Alice Chen", "avatarUrl": "a.svg"}],
        "comments": []
    }"#;

    fn client(server: &Server) -> BoardHttpClient {
        BoardHttpClient::new(&server.url(), 1_000).unwrap()
    }

    #[test]
    fn test_task_ids_are_percent_encoded_in_paths() {
        let client = BoardHttpClient::new("http://board.test/", 1_000).unwrap();
        assert_eq!(client.url_tasks, "http://board.test/api/tasks");
        assert_eq!(
            client.task_url("a/b?c#d", &["comments", "c 1"]).unwrap(),
            "http://board.test/api/tasks/a%2Fb%3Fc%23d/comments/c%201"
        );

        let nested = BoardHttpClient::new("http://board.test/board", 1_000).unwrap();
        assert_eq!(
            nested.task_url("t1", &["move"]).unwrap(),
            "http://board.test/board/api/tasks/t1/move"
        );
    }

    #[test]
    fn test_preview_body_empty() {
        assert_eq!(preview_body("   "), "<empty body>");
    }

    #[test]
    fn test_preview_body_truncates() {
        let body = "a".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= BODY_PREVIEW_LIMIT + 3);
    }

    #[test]
    fn test_board_http_error_display_status() {
        let err = BoardHttpError::status_error(
            502,
            "http://board.test/api/tasks".to_string(),
            "bad gateway".to_string(),
        );
        let msg = err.to_string();
        assert!(msg.contains("kind=status"));
        assert!(msg.contains("status=502"));
        assert!(msg.contains("url=http://board.test/api/tasks"));
        assert!(msg.contains("bad gateway"));
    }

    #[test]
    fn test_error_body_maps_to_board_error() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"success":false,"error":"validation failed: title is required","error_code":"INVALID_REQUEST"}"#,
        )
        .unwrap();
        assert_eq!(
            body.board_error(),
            Some(BoardError::Validation("title is required".into()))
        );

        let incomplete: ErrorBody =
            serde_json::from_str(r#"{"error":"task not found","error_code":"NOT_FOUND"}"#)
                .unwrap();
        assert_eq!(incomplete.board_error(), None);
    }

    #[tokio::test]
    async fn test_list_tasks_decodes_wire_shape() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/tasks")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{TASK_JSON}]"))
            .create_async()
            .await;

        let tasks = client(&server).list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].column, Column::Todo);
        assert_eq!(tasks[0].assignees[0].avatar_url, "a.svg");
    }

    #[tokio::test]
    async fn test_reorder_posts_tasks_envelope() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/tasks/reorder")
            .match_body(Matcher::Json(serde_json::json!({
                "tasks": [
                    {"id": "a", "state": "Done", "position": 0},
                    {"id": "b", "state": "Done", "position": 1}
                ]
            })))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        client(&server)
            .reorder_tasks(vec![
                ReorderEntry::new("a", Column::Done, 0),
                ReorderEntry::new("b", Column::Done, 1),
            ])
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_envelope_becomes_board_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/tasks/ghost")
            .with_status(404)
            .with_body(
                r#"{"success":false,"error":"task not found: ghost","error_code":"NOT_FOUND","entity":"task","entity_id":"ghost"}"#,
            )
            .create_async()
            .await;

        let err = client(&server).get_task("ghost").await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<BoardError>(),
            Some(&BoardError::task_not_found("ghost"))
        );
    }

    #[tokio::test]
    async fn test_plain_status_error_keeps_transport_detail() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PATCH", "/api/tasks/t1/move")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = client(&server)
            .move_task(
                "t1",
                MoveTaskInput {
                    column: Column::Done,
                    position: 0,
                },
            )
            .await
            .unwrap_err();
        let http_err = err
            .downcast_ref::<BoardHttpError>()
            .expect("expected BoardHttpError");
        assert_eq!(http_err.kind(), BoardHttpErrorKind::Status);
        assert_eq!(http_err.status(), Some(502));
        assert!(http_err.url().unwrap_or_default().contains("/api/tasks/t1/move"));
    }

    #[tokio::test]
    async fn test_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/users")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client(&server).list_users().await.unwrap_err();
        let http_err = err
            .downcast_ref::<BoardHttpError>()
            .expect("expected BoardHttpError");
        assert_eq!(http_err.kind(), BoardHttpErrorKind::Decode);
        assert!(http_err.to_string().contains("failed to decode response body"));
    }

    #[tokio::test]
    async fn test_delete_requires_ack() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("DELETE", "/api/tasks/t1/comments/c1")
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;
        client(&server).delete_comment("t1", "c1").await.unwrap();
    }
}
