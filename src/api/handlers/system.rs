//! System endpoints: health check and relay route catalog.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    active_sessions: usize,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp, and the number of live relays.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            active_sessions: state.sessions.len().await,
        }),
    )
}

/// Relay route info.
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteInfo {
    path: &'static str,
    description: &'static str,
    frames: &'static str,
    enabled: bool,
    upstream: Option<String>,
}

/// `GET /config/routes` — List relay routes and their upstreams.
#[utoipa::path(
    get,
    path = "/config/routes",
    tag = "System",
    summary = "List relay routes",
    description = "Returns every WebSocket relay route the gateway serves, whether it is enabled, and its fixed upstream if any.",
    responses(
        (status = 200, description = "Relay route catalog", body = Vec<RouteInfo>),
    )
)]
pub async fn routes_handler(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;
    let routes = vec![
        RouteInfo {
            path: "/ssh",
            description: "Terminal relay for browser and native terminal clients",
            frames: "text",
            enabled: true,
            upstream: Some(config.terminal_upstream.clone()),
        },
        RouteInfo {
            path: "/ws",
            description: "Dial-through relay selected by ?network=&address=",
            frames: "binary",
            enabled: config.dial_enabled,
            upstream: None,
        },
        RouteInfo {
            path: "/websockify",
            description: "Fixed binary relay (e.g. VNC for noVNC)",
            frames: "binary",
            enabled: config.binary_upstream.is_some(),
            upstream: config.binary_upstream.clone(),
        },
    ];
    (StatusCode::OK, Json(routes))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/routes", get(routes_handler))
}
