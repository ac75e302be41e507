//! Connection bridge: relays bytes between a terminal surface and a WebSocket.
//!
//! The bridge is transport-agnostic. It owns one [`TerminalSurface`] and one
//! [`SocketPort`] and reacts to four events: socket open, socket message,
//! terminal input, and socket close. No framing, buffering, or retry happens
//! here; payloads pass through verbatim.

pub mod connection_bridge;
pub mod location;
pub mod payload;
pub mod ready_state;
pub mod surface;

pub use connection_bridge::{
    BridgeStats, CloseInfo, ConnectionBridge, DISCONNECT_BANNER, InputOutcome,
};
pub use location::{PageLocation, SSH_PATH};
pub use payload::Payload;
pub use ready_state::ReadyState;
pub use surface::{SocketPort, TerminalSurface};
