//! Full gateway router: HTTP API plus the WebSocket relay routes.

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::ws::handler::{dial_handler, ssh_handler, websockify_handler};

/// Builds the application with tracing and permissive CORS layers.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ssh", get(ssh_handler))
        .route("/ws", get(dial_handler))
        .route("/websockify", get(websockify_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
