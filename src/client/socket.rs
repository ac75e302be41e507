//! Socket port backed by the client event loop.

use std::collections::VecDeque;

use crate::bridge::{Payload, ReadyState, SocketPort};
use crate::error::BridgeError;

/// [`SocketPort`] whose sends are handed to the event loop.
///
/// The bridge's handlers are synchronous while the WebSocket sink is async,
/// so accepted payloads wait here until the loop writes them out, which it
/// does right after the handler returns. The ready state is driven by the
/// loop as the connection progresses.
#[derive(Debug)]
pub struct LoopSocket {
    state: ReadyState,
    outbox: VecDeque<Payload>,
}

impl LoopSocket {
    /// A socket that has not finished its handshake.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ReadyState::Connecting,
            outbox: VecDeque::new(),
        }
    }

    /// Moves the socket to `state`. Leaving `Open` discards unsent payloads.
    pub fn set_state(&mut self, state: ReadyState) {
        if !state.is_open() {
            self.outbox.clear();
        }
        self.state = state;
    }

    /// Takes the next payload awaiting transmission.
    pub fn next_outgoing(&mut self) -> Option<Payload> {
        self.outbox.pop_front()
    }
}

impl Default for LoopSocket {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketPort for LoopSocket {
    fn ready_state(&self) -> ReadyState {
        self.state
    }

    fn send(&mut self, payload: Payload) -> Result<(), BridgeError> {
        if !self.state.is_open() {
            return Err(BridgeError::SocketClosed);
        }
        self.outbox.push_back(payload);
        Ok(())
    }
}
