//! Local TTY as a terminal surface.

use std::io::{self, Write};

use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

use crate::bridge::TerminalSurface;

/// Terminal surface writing to the process's stdout.
///
/// Each write is flushed immediately so output appears as it arrives.
#[derive(Debug)]
pub struct StdoutSurface {
    out: io::Stdout,
}

impl StdoutSurface {
    /// Wraps the process stdout.
    #[must_use]
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSurface for StdoutSurface {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        let mut out = self.out.lock();
        out.write_all(data)?;
        out.flush()
    }
}

/// Keeps the local terminal in raw mode until dropped.
///
/// Raw mode passes every keystroke through unprocessed (Ctrl-C included),
/// leaving echo and line editing to the remote side.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Enables raw mode.
    ///
    /// # Errors
    ///
    /// Returns the I/O error reported by the terminal if raw mode cannot be
    /// enabled (for example when stdin is not a TTY).
    pub fn enable() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = crossterm::terminal::disable_raw_mode() {
            tracing::warn!(error = %err, "failed to restore terminal mode");
        }
    }
}

/// Spawns a task reading stdin in chunks of up to `chunk_size` bytes.
///
/// The returned channel closes when stdin reaches end of file or fails.
#[must_use]
pub fn spawn_stdin_reader(chunk_size: usize) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        let mut buf = vec![0u8; chunk_size.max(1)];
        loop {
            match stdin.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    let chunk = buf.get(..n).unwrap_or_default().to_vec();
                    if tx.send(chunk).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "error reading stdin");
                    break;
                }
            }
        }
        tracing::debug!("stdin reader finished");
    });
    rx
}
