pub mod admin;
pub mod auth;
pub mod categories;
pub mod task_categories;
pub mod tasks;
pub mod users;

use axum::http::StatusCode;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::{AppState, BackendError};

pub type ApiError = (StatusCode, Json<Value>);

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(auth::routes())
        .merge(tasks::routes())
        .merge(categories::routes())
        .merge(task_categories::routes())
        .merge(users::routes())
        .merge(admin::routes())
        .with_state(state)
}

fn to_error(e: BackendError) -> ApiError {
    let (status, msg) = match e {
        BackendError::NotFound(m) => (StatusCode::NOT_FOUND, m),
        BackendError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
        BackendError::Conflict(m) => (StatusCode::CONFLICT, m),
        BackendError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
    };
    tracing::debug!(%status, error = %msg, "testkit error response");
    (status, Json(json!({ "error": msg })))
}
