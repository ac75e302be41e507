//! WebSocket ready state.

use std::fmt;

/// The four states of a WebSocket connection.
///
/// Discriminants match the browser `WebSocket.readyState` constants so the
/// numeric value can be logged the same way on both sides of the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadyState {
    /// The handshake has not completed yet.
    Connecting = 0,
    /// The connection is open and ready to communicate.
    Open = 1,
    /// A close handshake is in progress.
    Closing = 2,
    /// The connection is closed or could not be opened.
    Closed = 3,
}

impl ReadyState {
    /// Returns the numeric `readyState` value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` only for [`ReadyState::Open`].
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        write!(f, "{name} ({})", self.as_u8())
    }
}
