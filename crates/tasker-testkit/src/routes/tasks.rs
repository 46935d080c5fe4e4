use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tasker_core::task::{TaskId, TaskPayload};

use super::{to_error, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks/getAll", get(list_tasks))
        .route("/api/tasks/create", post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}

async fn list_tasks(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.lock().list_tasks()))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> Result<Json<Value>, ApiError> {
    state
        .lock()
        .get_task(id)
        .map(|t| Json(json!(t)))
        .map_err(to_error)
}

async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<TaskPayload>,
) -> Json<Value> {
    Json(json!(state.lock().create_task(input)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(input): Json<TaskPayload>,
) -> Result<Json<Value>, ApiError> {
    state
        .lock()
        .update_task(id, input)
        .map(|t| Json(json!(t)))
        .map_err(to_error)
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, ApiError> {
    state
        .lock()
        .delete_task(id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(to_error)
}
