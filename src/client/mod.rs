//! Native runtime for the connection bridge.
//!
//! Runs a [`crate::bridge::ConnectionBridge`] on a tokio event loop with
//! `tokio-tungstenite` as the WebSocket and the local TTY as the terminal.

pub mod session;
pub mod socket;
pub mod terminal;

pub use session::{SessionOutcome, run_session};
pub use socket::LoopSocket;
pub use terminal::{RawModeGuard, StdoutSurface, spawn_stdin_reader};
