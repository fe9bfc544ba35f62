//! Route table for the bridge.

use crate::server::handlers;
use crate::server::state::SharedState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/schema", get(handlers::schema))
        .route("/query", post(handlers::query))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
