//! Event loop driving a [`ConnectionBridge`] over a real WebSocket.
//!
//! All events run on one task: the handshake, socket messages, and terminal
//! input are handled in the order `select!` observes them.

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::socket::LoopSocket;
use crate::bridge::{
    BridgeStats, CloseInfo, ConnectionBridge, InputOutcome, Payload, ReadyState, TerminalSurface,
};
use crate::error::ClientError;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type Bridge<T> = ConnectionBridge<T, LoopSocket>;

/// What a finished session leaves behind.
#[derive(Debug)]
pub struct SessionOutcome<T> {
    /// The terminal surface, handed back to the caller.
    pub terminal: T,
    /// Bridge counters at the end of the session.
    pub stats: BridgeStats,
    /// How the socket closed.
    pub close: CloseInfo,
}

impl<T: TerminalSurface> SessionOutcome<T> {
    fn from_bridge(bridge: Bridge<T>, close: CloseInfo) -> Self {
        let (terminal, _socket, stats) = bridge.into_parts();
        Self {
            terminal,
            stats,
            close,
        }
    }
}

/// Opens one WebSocket to `url` and bridges it to `terminal` until it closes.
///
/// Terminal input arrives on `input`. Input received while the handshake is
/// still running is dropped, like any input while the socket is not open.
/// When `input` ends, a close handshake is started. Connection failures are
/// reported the same way as a close: the disconnect banner is printed and
/// the outcome records an abnormal close.
///
/// # Errors
///
/// Returns [`ClientError::Bridge`] if the terminal cannot be written.
pub async fn run_session<T: TerminalSurface>(
    url: &str,
    terminal: T,
    mut input: mpsc::Receiver<Vec<u8>>,
) -> Result<SessionOutcome<T>, ClientError> {
    let mut bridge = ConnectionBridge::new(terminal, LoopSocket::new());
    let mut input_open = true;

    tracing::info!(%url, "connecting");
    let connect = connect_async(url);
    tokio::pin!(connect);

    let connected = loop {
        tokio::select! {
            result = &mut connect => break result,
            chunk = input.recv(), if input_open => match chunk {
                Some(bytes) => {
                    bridge.on_input(Payload::from_bytes(bytes));
                }
                None => input_open = false,
            },
        }
    };

    let ws = match connected {
        Ok((ws, _response)) => ws,
        Err(err) => {
            tracing::warn!(%url, error = %err, "websocket connection failed");
            bridge.socket_mut().set_state(ReadyState::Closed);
            let close = CloseInfo::abnormal(err.to_string());
            bridge.on_close(&close)?;
            return Ok(SessionOutcome::from_bridge(bridge, close));
        }
    };

    bridge.socket_mut().set_state(ReadyState::Open);
    bridge.on_open();
    let (mut sink, mut stream) = ws.split();

    if !input_open {
        begin_close(&mut bridge, &mut sink).await;
    }

    let close = loop {
        tokio::select! {
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    bridge.on_message(&Payload::Text(text.as_str().to_owned()))?;
                }
                Some(Ok(Message::Binary(bytes))) => {
                    bridge.on_message(&Payload::Binary(bytes.to_vec()))?;
                }
                Some(Ok(Message::Close(frame))) => break close_info(frame),
                Some(Ok(_)) => {}
                Some(Err(err)) => break CloseInfo::abnormal(err.to_string()),
                None => break CloseInfo::abnormal("connection ended without close frame"),
            },
            chunk = input.recv(), if input_open => match chunk {
                Some(bytes) => {
                    if bridge.on_input(Payload::from_bytes(bytes)) == InputOutcome::Sent {
                        flush_outgoing(&mut bridge, &mut sink).await;
                    }
                }
                None => {
                    input_open = false;
                    begin_close(&mut bridge, &mut sink).await;
                }
            },
        }
    };

    bridge.socket_mut().set_state(ReadyState::Closed);
    bridge.on_close(&close)?;
    Ok(SessionOutcome::from_bridge(bridge, close))
}

/// Writes every payload the bridge accepted to the WebSocket sink.
async fn flush_outgoing<T: TerminalSurface>(bridge: &mut Bridge<T>, sink: &mut WsSink) {
    while let Some(payload) = bridge.socket_mut().next_outgoing() {
        let message = match payload {
            Payload::Text(text) => Message::text(text),
            Payload::Binary(bytes) => Message::binary(bytes),
        };
        if let Err(err) = sink.send(message).await {
            tracing::warn!(error = %err, "websocket send failed");
            bridge.socket_mut().set_state(ReadyState::Closed);
            break;
        }
    }
}

/// Starts the close handshake; the loop keeps reading until the peer answers.
async fn begin_close<T: TerminalSurface>(bridge: &mut Bridge<T>, sink: &mut WsSink) {
    tracing::debug!("terminal input ended, closing websocket");
    bridge.socket_mut().set_state(ReadyState::Closing);
    if let Err(err) = sink.send(Message::Close(None)).await {
        tracing::debug!(error = %err, "close frame not sent");
    }
}

fn close_info(frame: Option<CloseFrame>) -> CloseInfo {
    match frame {
        Some(frame) => CloseInfo::clean(Some(u16::from(frame.code)), frame.reason.as_str()),
        None => CloseInfo::clean(None, ""),
    }
}
