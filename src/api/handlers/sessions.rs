//! Live relay session handlers: list and get.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::SessionListResponse;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, RelayError};
use crate::session::{SessionId, SessionSummary};

/// `GET /sessions` — List live relay sessions.
#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "Sessions",
    summary = "List relay sessions",
    description = "Returns every live relay, oldest first, with its route, upstream, and byte counters.",
    responses(
        (status = 200, description = "Live sessions", body = SessionListResponse),
    )
)]
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.sessions.list().await;
    Json(SessionListResponse {
        count: sessions.len(),
        sessions,
    })
}

/// `GET /sessions/{id}` — Get one live relay session.
///
/// # Errors
///
/// Returns [`RelayError::InvalidRequest`] for a malformed ID and
/// [`RelayError::SessionNotFound`] if the relay is not live.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    summary = "Get relay session",
    params(("id" = String, Path, description = "Session UUID")),
    responses(
        (status = 200, description = "Session details", body = SessionSummary),
        (status = 400, description = "Malformed session ID", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, RelayError> {
    let uuid: uuid::Uuid = id
        .parse()
        .map_err(|_| RelayError::InvalidRequest(format!("invalid session id: {id}")))?;
    let summary = state.sessions.get(SessionId::from(uuid)).await?;
    Ok(Json(summary))
}

/// Session routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/{id}", get(get_session))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::RelayConfig;
    use crate::session::{RelayRoute, RelaySession};

    fn app(state: AppState) -> Router {
        Router::new().nest("/api/v1", routes()).with_state(state)
    }

    async fn status_of(state: AppState, uri: &str) -> StatusCode {
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("bad request");
        };
        let Ok(response) = app(state).oneshot(request).await else {
            panic!("router failed");
        };
        response.status()
    }

    #[tokio::test]
    async fn list_is_ok_when_empty() {
        let state = AppState::new(RelayConfig::default());
        assert_eq!(status_of(state, "/api/v1/sessions").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn get_known_session() {
        let state = AppState::new(RelayConfig::default());
        let Ok(id) = state
            .sessions
            .insert(RelaySession::new(RelayRoute::Terminal, "127.0.0.1:2222"))
            .await
        else {
            panic!("insert failed");
        };
        let uri = format!("/api/v1/sessions/{id}");
        assert_eq!(status_of(state, &uri).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids() {
        let state = AppState::new(RelayConfig::default());
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        assert_eq!(status_of(state.clone(), &uri).await, StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(state, "/api/v1/sessions/not-a-uuid").await,
            StatusCode::BAD_REQUEST
        );
    }
}
