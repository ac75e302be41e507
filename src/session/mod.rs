//! Relay sessions: identity, metadata, and the live-session registry.

pub mod relay_session;
pub mod session_id;
pub mod session_registry;

pub use relay_session::{RelayCounters, RelayRoute, RelaySession, SessionSummary};
pub use session_id::SessionId;
pub use session_registry::SessionRegistry;
