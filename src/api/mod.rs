//! HTTP API module
//!
//! Control surface for a presentation layer: intents in, snapshots out.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::{
    health_handler, interval_handler, reconcile_handler, reset_handler, state_handler,
    status_handler, toggle_handler,
};

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/toggle", post(toggle_handler))
        .route("/reset", post(reset_handler))
        .route("/interval", put(interval_handler))
        .route("/reconcile", post(reconcile_handler))
        .route("/status", get(status_handler))
        .route("/state", get(state_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
