//! Embedded browser client: the terminal page and its bridge script.

use axum::Router;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::app_state::AppState;

const INDEX_HTML: &str = include_str!("../../../static/index.html");
const SSH_CLIENT_JS: &str = include_str!("../../../static/ssh-client.js");

/// `GET /` — Page hosting the terminal widget.
pub async fn index_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], INDEX_HTML)
}

/// `GET /ssh-client.js` — Browser-side connection bridge.
pub async fn client_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SSH_CLIENT_JS,
    )
}

/// Static asset routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/ssh-client.js", get(client_script_handler))
}
