use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tasker_core::category::TaskCategoryLink;
use tasker_core::task::TaskId;

use super::{to_error, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/taskcategories/", get(list_links))
        .route("/api/taskcategories/create", post(create_link))
        .route("/api/taskcategories/update", put(update_link))
        .route(
            "/api/taskcategories/{task_id}",
            get(category_of_task).delete(delete_link),
        )
}

async fn list_links(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .lock()
        .list_links()
        .map(|links| Json(json!(links)))
        .map_err(to_error)
}

async fn create_link(
    State(state): State<AppState>,
    Json(link): Json<TaskCategoryLink>,
) -> Result<StatusCode, ApiError> {
    state
        .lock()
        .link(link.task_id, link.category_id)
        .map(|_| StatusCode::CREATED)
        .map_err(to_error)
}

async fn update_link(
    State(state): State<AppState>,
    Json(link): Json<TaskCategoryLink>,
) -> Result<StatusCode, ApiError> {
    state
        .lock()
        .relink(link.task_id, link.category_id)
        .map(|_| StatusCode::OK)
        .map_err(to_error)
}

/// 204 when the task has no category.
async fn category_of_task(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
) -> Response {
    match state.lock().lookup_category(task_id) {
        Ok(Some(category)) => Json(json!(category)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => to_error(e).into_response(),
    }
}

async fn delete_link(State(state): State<AppState>, Path(task_id): Path<TaskId>) -> StatusCode {
    state.lock().unlink(task_id);
    StatusCode::NO_CONTENT
}
