use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tasker_core::user::{UserDraft, UserId};

use super::{to_error, ApiError};
use crate::state::{user_json, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/create", post(create_user))
        .route("/api/admin/users/{id}", put(update_user).delete(delete_user))
        .route("/api/admin/tasks", get(list_tasks))
}

async fn list_users(State(state): State<AppState>) -> Json<Value> {
    let users: Vec<Value> = state.lock().list_users().iter().map(user_json).collect();
    Json(Value::Array(users))
}

async fn create_user(
    State(state): State<AppState>,
    Json(draft): Json<UserDraft>,
) -> Result<Json<Value>, ApiError> {
    state
        .lock()
        .create_user(draft)
        .map(|u| Json(user_json(&u)))
        .map_err(to_error)
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(draft): Json<UserDraft>,
) -> Result<Json<Value>, ApiError> {
    state
        .lock()
        .update_user(id, draft)
        .map(|u| Json(user_json(&u)))
        .map_err(to_error)
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, ApiError> {
    state
        .lock()
        .delete_user(id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(to_error)
}

async fn list_tasks(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.lock().list_tasks()))
}
