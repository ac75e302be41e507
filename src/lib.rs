//! # term-relay
//!
//! WebSocket terminal bridge and the relay gateway that serves it.
//!
//! A connection bridge pipes bytes between a terminal surface and one
//! WebSocket: socket messages are written to the terminal verbatim, terminal
//! input is sent to the socket while it is open, and a banner is printed
//! when the socket closes. The gateway terminates those WebSockets and
//! relays the bytes to TCP upstreams.
//!
//! ## Architecture
//!
//! ```text
//! Terminal (browser xterm.js / local TTY)
//!     │
//!     ├── ConnectionBridge (bridge/)
//!     ├── Native event loop (client/)
//!     │
//!     │   ws://host:port/ssh
//!     │
//!     ├── Relay handlers (ws/)
//!     ├── SessionRegistry (session/)
//!     ├── REST + static page (api/)
//!     │
//!     └── TCP upstream
//! ```

pub mod api;
pub mod app_state;
pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod ws;
