//! Metadata and live byte counters of one relay.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::SessionId;

/// Which endpoint a relay was opened through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelayRoute {
    /// `/ssh`: text frames to a terminal upstream.
    Terminal,
    /// `/ws`: dial-through with binary frames.
    Dial,
    /// `/websockify`: binary frames to a fixed upstream.
    Binary,
}

impl fmt::Display for RelayRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = match self {
            Self::Terminal => "/ssh",
            Self::Dial => "/ws",
            Self::Binary => "/websockify",
        };
        f.write_str(path)
    }
}

/// Byte counters shared between a relay loop and the registry.
#[derive(Debug, Default)]
pub struct RelayCounters {
    to_upstream: AtomicU64,
    to_client: AtomicU64,
}

impl RelayCounters {
    /// Records bytes written to the upstream.
    pub fn add_to_upstream(&self, n: usize) {
        self.to_upstream.fetch_add(n as u64, Ordering::Relaxed);
    }

    /// Records bytes forwarded to the WebSocket client.
    pub fn add_to_client(&self, n: usize) {
        self.to_client.fetch_add(n as u64, Ordering::Relaxed);
    }

    /// Bytes written to the upstream so far.
    #[must_use]
    pub fn to_upstream(&self) -> u64 {
        self.to_upstream.load(Ordering::Relaxed)
    }

    /// Bytes forwarded to the client so far.
    #[must_use]
    pub fn to_client(&self) -> u64 {
        self.to_client.load(Ordering::Relaxed)
    }
}

/// A live relay between one WebSocket client and one TCP upstream.
#[derive(Debug)]
pub struct RelaySession {
    /// Unique session identifier (immutable after creation).
    pub id: SessionId,
    /// Endpoint the client connected through.
    pub route: RelayRoute,
    /// Upstream `host:port`.
    pub target: String,
    /// Upgrade timestamp.
    pub opened_at: DateTime<Utc>,
    /// Live byte counters, shared with the relay loop.
    pub counters: Arc<RelayCounters>,
}

impl RelaySession {
    /// Creates a session stamped with the current time.
    #[must_use]
    pub fn new(route: RelayRoute, target: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            route,
            target: target.into(),
            opened_at: Utc::now(),
            counters: Arc::new(RelayCounters::default()),
        }
    }
}

/// Point-in-time view of a session for the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionSummary {
    /// Session identifier.
    pub id: uuid::Uuid,
    /// Endpoint the client connected through.
    pub route: RelayRoute,
    /// Upstream `host:port`.
    pub target: String,
    /// Upgrade timestamp.
    pub opened_at: DateTime<Utc>,
    /// Bytes written to the upstream.
    pub bytes_to_upstream: u64,
    /// Bytes forwarded to the client.
    pub bytes_to_client: u64,
}

impl From<&RelaySession> for SessionSummary {
    fn from(session: &RelaySession) -> Self {
        Self {
            id: *session.id.as_uuid(),
            route: session.route,
            target: session.target.clone(),
            opened_at: session.opened_at,
            bytes_to_upstream: session.counters.to_upstream(),
            bytes_to_client: session.counters.to_client(),
        }
    }
}
