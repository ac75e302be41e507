//! term-relay-client: bridges the local terminal to a relay's `/ssh` socket.

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use term_relay::bridge::PageLocation;
use term_relay::client::{RawModeGuard, StdoutSurface, run_session, spawn_stdin_reader};
use term_relay::config::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "term-relay-client", version, about)]
struct Args {
    /// Page address serving the terminal, e.g. `http://example.com:8080/` or
    /// `example.com:8080`. The socket URL is `ws://<host>:<port>/ssh`.
    #[arg(default_value = "localhost:8080")]
    page: String,

    /// Connect to this WebSocket URL instead of deriving it from the page.
    #[arg(long)]
    url: Option<String>,

    /// Maximum bytes of terminal input per message.
    #[arg(long, default_value_t = 1024)]
    chunk_size: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    let url = match args.url {
        Some(url) => url,
        None => PageLocation::parse(&args.page)
            .context("invalid page address")?
            .socket_url(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let raw_mode = if std::io::stdin().is_terminal() {
        Some(RawModeGuard::enable().context("failed to enable raw mode")?)
    } else {
        None
    };

    let result = runtime.block_on(async {
        let input = spawn_stdin_reader(args.chunk_size);
        run_session(&url, StdoutSurface::new(), input).await
    });

    drop(raw_mode);
    // The stdin reader blocks on a read that never returns; do not wait for it.
    runtime.shutdown_timeout(Duration::from_millis(100));

    let outcome = result.context("terminal session failed")?;
    tracing::info!(
        clean = outcome.close.clean,
        code = ?outcome.close.code,
        inputs_sent = outcome.stats.inputs_sent,
        inputs_dropped = outcome.stats.inputs_dropped,
        messages_written = outcome.stats.messages_written,
        "session ended"
    );
    Ok(())
}
