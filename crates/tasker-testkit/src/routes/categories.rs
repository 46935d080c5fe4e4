use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::{to_error, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories/getAll", get(list_categories))
        .route("/api/categories/create", post(create_category))
}

async fn list_categories(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.lock().list_categories()))
}

/// The body is stored verbatim as the category name.
async fn create_category(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Value>, ApiError> {
    state
        .lock()
        .create_category(body)
        .map(|c| Json(json!(c)))
        .map_err(to_error)
}
