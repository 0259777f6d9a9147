//! HTTP路由handlers
//!
//! Every handler does its store work synchronously under the store lock and
//! never awaits while holding it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::Local;
use taskboard_core::api::{Comment, MoveTaskInput, Task, UpdateTaskInput, User};
use taskboard_plugins::store::{SqliteStore, StoreError};

use crate::http::{
    models::*,
    state::AppState,
    validation::{validate_comment, validate_position, validate_reorder},
};

/// 创建所有路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/tasks", get(list_tasks_handler).post(create_task_handler))
        .route("/api/tasks/reorder", post(reorder_tasks_handler))
        .route(
            "/api/tasks/:id",
            get(get_task_handler)
                .patch(update_task_handler)
                .delete(delete_task_handler),
        )
        .route("/api/tasks/:id/move", patch(move_task_handler))
        .route(
            "/api/tasks/:id/comments",
            get(list_comments_handler).post(add_comment_handler),
        )
        .route(
            "/api/tasks/:id/comments/:comment_id",
            delete(delete_comment_handler),
        )
        .route("/api/users", get(list_users_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Count the request, run `op` against the locked store and count failures.
fn with_store<T>(
    state: &AppState,
    endpoint: &str,
    op: impl FnOnce(&mut SqliteStore) -> Result<T, StoreError>,
) -> Result<T, HttpServerError> {
    state.record_request(endpoint);
    let result = state
        .lock_store()
        .and_then(|mut store| op(&mut *store).map_err(HttpServerError::from));
    if let Err(err) = &result {
        state.record_error();
        tracing::debug!(target: "taskboard.http", endpoint, error = ?err, "handler failed");
    }
    result
}

/// GET /api/tasks - 全部任务（按列和位置排序）
async fn list_tasks_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Task>>, HttpServerError> {
    with_store(&state, "GET /api/tasks", |store| store.list_tasks()).map(Json)
}

/// GET /api/tasks/:id
async fn get_task_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, HttpServerError> {
    with_store(&state, "GET /api/tasks/:id", |store| store.get_task(&id)).map(Json)
}

/// POST /api/tasks - 创建任务，追加到目标列末尾
async fn create_task_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), HttpServerError> {
    let task = with_store(&state, "POST /api/tasks", |store| {
        store.create_task(req.into())
    })?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/tasks/:id - 仅修改字段，不改变列和位置
async fn update_task_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskInput>,
) -> Result<Json<Task>, HttpServerError> {
    with_store(&state, "PATCH /api/tasks/:id", |store| {
        store.update_task(&id, req)
    })
    .map(Json)
}

/// PATCH /api/tasks/:id/move - 单任务移动
async fn move_task_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveTaskRequest>,
) -> Result<Json<Task>, HttpServerError> {
    with_store(&state, "PATCH /api/tasks/:id/move", |store| {
        let position = validate_position(req.position)?;
        store.move_task(
            &id,
            MoveTaskInput {
                column: req.state,
                position,
            },
        )
    })
    .map(Json)
}

/// POST /api/tasks/reorder - 批量写入位置
async fn reorder_tasks_handler(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<AckResponse>, HttpServerError> {
    with_store(&state, "POST /api/tasks/reorder", |store| {
        let entries = validate_reorder(req.tasks)?;
        store.reorder_tasks(&entries)
    })?;
    Ok(AckResponse::ok())
}

/// DELETE /api/tasks/:id
async fn delete_task_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AckResponse>, HttpServerError> {
    with_store(&state, "DELETE /api/tasks/:id", |store| store.delete_task(&id))?;
    Ok(AckResponse::ok())
}

/// GET /api/tasks/:id/comments
async fn list_comments_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, HttpServerError> {
    with_store(&state, "GET /api/tasks/:id/comments", |store| {
        store.list_comments(&id)
    })
    .map(Json)
}

/// POST /api/tasks/:id/comments
async fn add_comment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), HttpServerError> {
    let comment = with_store(&state, "POST /api/tasks/:id/comments", |store| {
        let input = validate_comment(req)?;
        store.add_comment(&id, input)
    })?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/tasks/:id/comments/:comment_id
async fn delete_comment_handler(
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<AckResponse>, HttpServerError> {
    with_store(&state, "DELETE /api/tasks/:id/comments/:comment_id", |store| {
        store.delete_comment(&id, &comment_id)
    })?;
    Ok(AckResponse::ok())
}

/// GET /api/users
async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, HttpServerError> {
    with_store(&state, "GET /api/users", |store| store.list_users()).map(Json)
}

/// GET /health - 健康检查
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    state.record_request("GET /health");
    let stats = state.stats.read().unwrap_or_else(|p| p.into_inner());

    Json(HealthResponse {
        status: "healthy".into(),
        uptime_seconds: stats.uptime_seconds(),
        requests_handled: stats.requests_total,
        errors_total: stats.errors_total,
        timestamp: Local::now().to_rfc3339(),
    })
}
