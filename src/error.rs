//! Error types for the bridge, the terminal client, and the relay gateway.
//!
//! [`RelayError`] is the gateway's central error type. Each variant maps to a
//! specific HTTP status code and structured JSON error response, returned
//! before a WebSocket upgrade completes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: missing 'network' or 'address' query parameters",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Gateway error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                 |
/// |-----------|-------------------|-----------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request             |
/// | 2000–2999 | Not Found / Policy| 404 Not Found / 403 Forbidden |
/// | 3000–3999 | Server            | 500 Internal Server Error   |
/// | 5000–5999 | Upstream          | 502 Bad Gateway             |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The `network` query parameter names an unsupported network.
    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    /// No relay session with the given ID is live.
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    /// The requested relay route is not configured.
    #[error("relay route disabled: {0}")]
    RouteDisabled(&'static str),

    /// The dial target is not on the allowlist.
    #[error("target not allowed: {0}")]
    TargetNotAllowed(String),

    /// The upstream could not be reached.
    #[error("upstream {target} unavailable: {source}")]
    UpstreamUnavailable {
        /// Address that was dialed.
        target: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The upstream did not accept the connection in time.
    #[error("upstream {target} timed out after {timeout_secs} s")]
    UpstreamTimeout {
        /// Address that was dialed.
        target: String,
        /// Configured connect timeout.
        timeout_secs: u64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::UnsupportedNetwork(_) => 1002,
            Self::SessionNotFound(_) => 2001,
            Self::RouteDisabled(_) => 2002,
            Self::TargetNotAllowed(_) => 2003,
            Self::Internal(_) => 3000,
            Self::UpstreamUnavailable { .. } => 5001,
            Self::UpstreamTimeout { .. } => 5002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::UnsupportedNetwork(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) | Self::RouteDisabled(_) => StatusCode::NOT_FOUND,
            Self::TargetNotAllowed(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamUnavailable { .. } | Self::UpstreamTimeout { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

/// Failures inside the connection bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The page address could not be turned into a socket URL.
    #[error("invalid page location: {0}")]
    InvalidLocation(String),

    /// Writing to the terminal surface failed.
    #[error("terminal write failed: {0}")]
    Terminal(#[from] std::io::Error),

    /// The socket no longer accepts data.
    #[error("websocket is closed")]
    SocketClosed,
}

/// Failures of the native terminal client runtime.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Bridge handler failure (terminal unwritable).
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_request() {
        let err = RelayError::InvalidRequest("missing address".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
        assert_eq!(
            RelayError::UnsupportedNetwork("udp".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_errors_are_bad_gateway() {
        let err = RelayError::UpstreamUnavailable {
            target: "127.0.0.1:1".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().starts_with("upstream 127.0.0.1:1 unavailable"));

        let timeout = RelayError::UpstreamTimeout {
            target: "10.0.0.1:22".to_string(),
            timeout_secs: 5,
        };
        assert_eq!(timeout.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(timeout.error_code(), 5002);
    }

    #[test]
    fn policy_errors() {
        assert_eq!(
            RelayError::TargetNotAllowed("db:5432".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            RelayError::RouteDisabled("/websockify").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn into_response_carries_status() {
        let response = RelayError::SessionNotFound(uuid::Uuid::nil()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
