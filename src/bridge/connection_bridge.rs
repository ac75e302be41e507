//! Event handlers wiring a terminal surface to a socket.

use super::{Payload, ReadyState, SocketPort, TerminalSurface};
use crate::error::BridgeError;

/// Banner written to the terminal when the socket closes.
pub const DISCONNECT_BANNER: &str = "\r\n\x1B[1;31mDisconnected from SSH server.\x1B[0m\r\n";

/// Result of handling one chunk of terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The payload was handed to the socket unchanged.
    Sent,
    /// The payload was discarded; carries the state that caused it.
    Dropped(ReadyState),
}

/// Details of a socket close, used for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CloseInfo {
    /// Close code sent by the peer, if any.
    pub code: Option<u16>,
    /// Close reason sent by the peer.
    pub reason: String,
    /// `false` when the connection ended without a close handshake.
    pub clean: bool,
}

impl CloseInfo {
    /// A close completed with a handshake.
    #[must_use]
    pub fn clean(code: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
            clean: true,
        }
    }

    /// A close caused by a transport failure (refused, reset, handshake error).
    #[must_use]
    pub fn abnormal(reason: impl Into<String>) -> Self {
        Self {
            code: None,
            reason: reason.into(),
            clean: false,
        }
    }
}

/// Counters describing what a bridge has done so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeStats {
    /// Socket messages written to the terminal.
    pub messages_written: u64,
    /// Bytes written to the terminal from socket messages.
    pub bytes_written: u64,
    /// Terminal inputs handed to the socket.
    pub inputs_sent: u64,
    /// Terminal inputs discarded because the socket was not open.
    pub inputs_dropped: u64,
    /// Disconnect banners written (0 or 1).
    pub banners_written: u64,
}

/// Relays bytes between one terminal surface and one socket.
///
/// Every handler runs to completion without blocking, so the bridge can be
/// driven from any single-threaded event loop. Messages are written in the
/// order the handlers are called; nothing is buffered or reordered.
#[derive(Debug)]
pub struct ConnectionBridge<T, S> {
    terminal: T,
    socket: S,
    stats: BridgeStats,
    closed: bool,
}

impl<T, S> ConnectionBridge<T, S>
where
    T: TerminalSurface,
    S: SocketPort,
{
    /// Wires a terminal surface to a socket.
    #[must_use]
    pub fn new(terminal: T, socket: S) -> Self {
        Self {
            terminal,
            socket,
            stats: BridgeStats::default(),
            closed: false,
        }
    }

    /// Socket handshake completed. Diagnostic only.
    pub fn on_open(&mut self) {
        tracing::info!(ready_state = %self.socket.ready_state(), "websocket connected");
    }

    /// Writes a received message to the terminal verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Terminal`] if the terminal write fails.
    pub fn on_message(&mut self, payload: &Payload) -> Result<(), BridgeError> {
        self.terminal.write(payload.as_bytes())?;
        self.stats.messages_written += 1;
        self.stats.bytes_written += payload.len() as u64;
        Ok(())
    }

    /// Forwards terminal input to the socket if it is open.
    ///
    /// When the socket is in any other state the input is discarded and a
    /// single error event is logged. Nothing is queued for later.
    pub fn on_input(&mut self, payload: Payload) -> InputOutcome {
        tracing::trace!(len = payload.len(), "terminal input");

        let state = self.socket.ready_state();
        if !state.is_open() {
            tracing::error!(ready_state = %state, "websocket is not open, dropping input");
            self.stats.inputs_dropped += 1;
            return InputOutcome::Dropped(state);
        }

        match self.socket.send(payload) {
            Ok(()) => {
                self.stats.inputs_sent += 1;
                InputOutcome::Sent
            }
            Err(err) => {
                tracing::error!(error = %err, "websocket send failed, dropping input");
                self.stats.inputs_dropped += 1;
                InputOutcome::Dropped(self.socket.ready_state())
            }
        }
    }

    /// Prints the disconnect banner.
    ///
    /// Clean and abrupt closes are handled the same way. Only the first call
    /// writes the banner; returns whether it was written by this call.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Terminal`] if the banner cannot be written.
    pub fn on_close(&mut self, info: &CloseInfo) -> Result<bool, BridgeError> {
        if self.closed {
            tracing::debug!("close already handled");
            return Ok(false);
        }
        self.closed = true;
        tracing::info!(
            code = ?info.code,
            reason = %info.reason,
            clean = info.clean,
            "websocket disconnected"
        );
        self.terminal.write(DISCONNECT_BANNER.as_bytes())?;
        self.stats.banners_written += 1;
        Ok(true)
    }

    /// Returns `true` once a close has been handled.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> BridgeStats {
        self.stats
    }

    /// Shared access to the socket.
    #[must_use]
    pub const fn socket(&self) -> &S {
        &self.socket
    }

    /// Mutable access to the socket, used by the event loop to flush sends
    /// and update the ready state.
    pub fn socket_mut(&mut self) -> &mut S {
        &mut self.socket
    }

    /// Shared access to the terminal surface.
    #[must_use]
    pub const fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Tears the bridge apart, returning the terminal and socket.
    #[must_use]
    pub fn into_parts(self) -> (T, S, BridgeStats) {
        (self.terminal, self.socket, self.stats)
    }
}
