//! Seams between the bridge and its two external collaborators.

use std::io;

use super::{Payload, ReadyState};
use crate::error::BridgeError;

/// A terminal rendering surface.
///
/// Receives raw output bytes, ANSI escapes included. Emulation is the
/// surface's job, not the bridge's.
pub trait TerminalSurface {
    /// Writes bytes to the terminal.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the surface cannot be written.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;
}

/// The sending half of a WebSocket as seen by the bridge.
pub trait SocketPort {
    /// Current state of the socket.
    fn ready_state(&self) -> ReadyState;

    /// Hands a payload to the socket for transmission.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::SocketClosed`] if the socket can no longer
    /// accept data.
    fn send(&mut self, payload: Payload) -> Result<(), BridgeError>;
}
