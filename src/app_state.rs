//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::session::SessionRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Gateway configuration, loaded once at startup.
    pub config: Arc<RelayConfig>,
    /// Live relay sessions.
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// Builds state with an empty session registry.
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}
