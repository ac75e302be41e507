//! Session listing DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::session::SessionSummary;

/// Response body of `GET /api/v1/sessions`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionListResponse {
    /// Live sessions, oldest first.
    pub sessions: Vec<SessionSummary>,
    /// Number of live sessions.
    pub count: usize,
}
