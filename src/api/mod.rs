//! HTTP layer: route handlers, DTOs, OpenAPI document, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; system and static routes
//! live at the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "term-relay", description = "WebSocket terminal relay gateway"),
    paths(
        handlers::system::health_handler,
        handlers::system::routes_handler,
        handlers::sessions::list_sessions,
        handlers::sessions::get_session,
    ),
    tags(
        (name = "System", description = "Health and configuration"),
        (name = "Sessions", description = "Live relay sessions"),
    )
)]
pub struct ApiDoc;

/// Builds the complete HTTP router with all non-WebSocket endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
        .merge(handlers::assets::routes());
    with_docs(router)
}

#[cfg(feature = "swagger-ui")]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    router.route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/config/routes",
            "/api/v1/sessions",
            "/api/v1/sessions/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
