use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/aggregate", get(handlers::get_aggregate))
        .route("/api/select", post(handlers::select))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/summary", get(handlers::get_summary))
        .with_state(state)
}
