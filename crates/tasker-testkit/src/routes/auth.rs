use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/isAdmin", get(is_admin))
}

async fn logout(State(state): State<AppState>) -> StatusCode {
    state.lock().logout();
    StatusCode::OK
}

async fn is_admin(State(state): State<AppState>) -> Json<bool> {
    Json(state.lock().is_admin())
}
