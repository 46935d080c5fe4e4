use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tasker_core::user::ProfileUpdate;

use super::{to_error, ApiError};
use crate::state::{user_json, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/info", get(profile))
        .route("/api/users/update/info", put(update_profile))
        .route("/api/users/update/password", put(change_password))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordQuery {
    current_password: String,
    new_password: String,
}

async fn profile(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .lock()
        .profile()
        .map(|u| Json(user_json(&u)))
        .map_err(to_error)
}

async fn update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Value>, ApiError> {
    state
        .lock()
        .update_profile(update)
        .map(|u| Json(user_json(&u)))
        .map_err(to_error)
}

async fn change_password(
    State(state): State<AppState>,
    Query(q): Query<PasswordQuery>,
) -> Result<StatusCode, ApiError> {
    state
        .lock()
        .change_password(&q.current_password, &q.new_password)
        .map(|_| StatusCode::OK)
        .map_err(to_error)
}
