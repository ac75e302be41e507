//! Axum WebSocket upgrade handlers for the relay routes.
//!
//! The upstream is dialed before the upgrade is accepted, so an unreachable
//! upstream is reported as an HTTP error instead of an immediately closed
//! socket.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::Response;

use super::dial::dial;
use super::params::{DialParams, DialTarget, FrameMode};
use super::relay::run_relay;
use crate::app_state::AppState;
use crate::error::RelayError;
use crate::session::{RelayRoute, RelaySession};

/// `GET /ssh` — Upgrade and relay to the terminal upstream with text frames.
///
/// # Errors
///
/// Returns [`RelayError::UpstreamUnavailable`] or
/// [`RelayError::UpstreamTimeout`] if the upstream cannot be reached.
pub async fn ssh_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Result<Response, RelayError> {
    let target = DialTarget::tcp(state.config.terminal_upstream.clone());
    open_relay(ws, state, RelayRoute::Terminal, target, FrameMode::Text).await
}

/// `GET /ws?network=..&address=..` — Upgrade and relay to a client-chosen
/// upstream with binary frames.
///
/// # Errors
///
/// Returns [`RelayError::RouteDisabled`] when dialing is switched off, a
/// validation error for a bad query, or an upstream error if the dial fails.
pub async fn dial_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<DialParams>,
) -> Result<Response, RelayError> {
    if !state.config.dial_enabled {
        return Err(RelayError::RouteDisabled("/ws"));
    }
    let target = params.validate(&state.config)?;
    open_relay(ws, state, RelayRoute::Dial, target, FrameMode::Binary).await
}

/// `GET /websockify` — Upgrade and relay to the binary upstream.
///
/// # Errors
///
/// Returns [`RelayError::RouteDisabled`] when no binary upstream is
/// configured, or an upstream error if the dial fails.
pub async fn websockify_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Result<Response, RelayError> {
    let Some(address) = state.config.binary_upstream.clone() else {
        return Err(RelayError::RouteDisabled("/websockify"));
    };
    open_relay(
        ws,
        state,
        RelayRoute::Binary,
        DialTarget::tcp(address),
        FrameMode::Binary,
    )
    .await
}

async fn open_relay(
    ws: WebSocketUpgrade,
    state: AppState,
    route: RelayRoute,
    target: DialTarget,
    mode: FrameMode,
) -> Result<Response, RelayError> {
    tracing::info!(%route, target = %target.address, "new websocket relay");
    let upstream = match dial(&target, state.config.upstream_connect_timeout()).await {
        Ok(stream) => stream,
        Err(err) => {
            tracing::warn!(%route, error = %err, "upstream dial failed");
            return Err(err);
        }
    };
    let buffer_size = state.config.relay_buffer_size;

    Ok(ws.on_upgrade(move |socket| async move {
        let session = RelaySession::new(route, target.address);
        let counters = Arc::clone(&session.counters);
        let id = match state.sessions.insert(session).await {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(error = %err, "failed to register relay session");
                return;
            }
        };
        tracing::info!(session = %id, %route, "relay opened");

        let end = run_relay(socket, upstream, mode, buffer_size, counters).await;

        match state.sessions.remove(id).await {
            Ok(session) => tracing::info!(
                session = %id,
                ?end,
                bytes_to_upstream = session.counters.to_upstream(),
                bytes_to_client = session.counters.to_client(),
                "relay closed"
            ),
            Err(err) => tracing::warn!(session = %id, error = %err, "relay session vanished"),
        }
    }))
}
