use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/log", post(handlers::submit_log_form))
        .route("/api/data", get(handlers::get_data))
        .route("/api/log", post(handlers::save_log))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/export", get(handlers::export_data))
        .with_state(state)
}
