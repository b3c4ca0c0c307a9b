// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{fleet_report, health_check, list_mills, mill_detail};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/mills", get(list_mills))
        .route("/mills/:id", get(mill_detail))
        .route("/fleet", get(fleet_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
