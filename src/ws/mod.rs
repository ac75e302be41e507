//! WebSocket layer: relay endpoints, upstream dialing, and the relay loop.
//!
//! - `/ssh` relays to the terminal upstream with text frames.
//! - `/ws` dials a client-chosen `network`/`address` with binary frames.
//! - `/websockify` relays to a fixed binary upstream.

pub mod dial;
pub mod handler;
pub mod params;
pub mod relay;
pub mod utf8;
