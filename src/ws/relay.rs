//! Byte relay between one WebSocket client and one TCP upstream.
//!
//! Each direction runs as its own loop and forwards frames in the order they
//! arrive.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use super::params::FrameMode;
use super::utf8::Utf8Chunker;
use crate::session::RelayCounters;

/// Why a relay loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEnd {
    /// The client sent a close frame or the stream ended.
    ClientClosed,
    /// The upstream reached end of stream.
    UpstreamClosed,
    /// Reading from or writing to the client failed.
    ClientError,
    /// Reading from or writing to the upstream failed.
    UpstreamError,
}

/// Runs the relay until either side goes away.
///
/// - Client text and binary frames are written verbatim to the upstream.
/// - Each upstream read of at most `buffer_size` bytes becomes one frame of
///   the given [`FrameMode`].
/// - Upstream end of stream sends a close frame to the client.
///
/// The two directions are polled concurrently, so a blocked upstream write
/// never stops the upstream from being drained. The relay ends as soon as
/// either direction finishes.
pub async fn run_relay(
    socket: WebSocket,
    upstream: TcpStream,
    mode: FrameMode,
    buffer_size: usize,
    counters: Arc<RelayCounters>,
) -> RelayEnd {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (mut up_rx, mut up_tx) = upstream.into_split();

    let end = tokio::select! {
        end = client_to_upstream(&mut ws_rx, &mut up_tx, &counters) => end,
        end = upstream_to_client(&mut up_rx, &mut ws_tx, mode, buffer_size, &counters) => end,
    };

    if let Err(err) = up_tx.shutdown().await {
        tracing::debug!(error = %err, "upstream shutdown failed");
    }
    end
}

async fn client_to_upstream(
    ws_rx: &mut SplitStream<WebSocket>,
    up_tx: &mut OwnedWriteHalf,
    counters: &RelayCounters,
) -> RelayEnd {
    loop {
        let data = match ws_rx.next().await {
            Some(Ok(Message::Text(text))) => text.as_str().as_bytes().to_vec(),
            Some(Ok(Message::Binary(bytes))) => bytes.to_vec(),
            Some(Ok(Message::Close(_))) | None => return RelayEnd::ClientClosed,
            Some(Ok(_)) => continue,
            Some(Err(err)) => {
                tracing::warn!(error = %err, "error reading from websocket");
                return RelayEnd::ClientError;
            }
        };
        if let Err(err) = up_tx.write_all(&data).await {
            tracing::warn!(error = %err, "error writing to upstream");
            return RelayEnd::UpstreamError;
        }
        counters.add_to_upstream(data.len());
    }
}

async fn upstream_to_client(
    up_rx: &mut OwnedReadHalf,
    ws_tx: &mut SplitSink<WebSocket, Message>,
    mode: FrameMode,
    buffer_size: usize,
    counters: &RelayCounters,
) -> RelayEnd {
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut decoder = Utf8Chunker::new();

    loop {
        match up_rx.read(&mut buf).await {
            Ok(0) => {
                tracing::debug!("upstream closed by remote");
                if let Some(rest) = decoder.finish() {
                    let _ = ws_tx.send(Message::text(rest)).await;
                }
                let _ = ws_tx.send(Message::Close(None)).await;
                return RelayEnd::UpstreamClosed;
            }
            Ok(n) => {
                let chunk = buf.get(..n).unwrap_or_default();
                let frame = match mode {
                    FrameMode::Binary => Some(Message::binary(chunk.to_vec())),
                    FrameMode::Text => decoder.push(chunk).map(Message::text),
                };
                if let Some(frame) = frame
                    && ws_tx.send(frame).await.is_err()
                {
                    return RelayEnd::ClientError;
                }
                counters.add_to_client(n);
            }
            Err(err) => {
                tracing::warn!(error = %err, "error reading from upstream");
                let _ = ws_tx.send(Message::Close(None)).await;
                return RelayEnd::UpstreamError;
            }
        }
    }
}
