//! End-to-end tests of the gateway's relay routes over real sockets.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use term_relay::app_state::AppState;
use term_relay::config::RelayConfig;
use term_relay::router::build_app;
use term_relay::session::SessionRegistry;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn bind_local() -> (TcpListener, SocketAddr) {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    (listener, addr)
}

/// Boots the gateway on an ephemeral port.
async fn spawn_gateway(config: RelayConfig) -> (SocketAddr, Arc<SessionRegistry>) {
    let (listener, addr) = bind_local().await;
    let state = AppState::new(config);
    let sessions = Arc::clone(&state.sessions);
    tokio::spawn(async move {
        let _ = axum::serve(listener, build_app(state)).await;
    });
    (addr, sessions)
}

async fn connect(url: &str) -> WsStream {
    let Ok(Ok((ws, _))) = timeout(TIMEOUT, connect_async(url)).await else {
        panic!("websocket connect to {url} failed");
    };
    ws
}

async fn accept(listener: &TcpListener) -> TcpStream {
    let Ok(Ok((stream, _))) = timeout(TIMEOUT, listener.accept()).await else {
        panic!("upstream accept failed");
    };
    stream
}

async fn next_message(ws: &mut WsStream) -> Option<Message> {
    let Ok(msg) = timeout(TIMEOUT, ws.next()).await else {
        panic!("timeout waiting for message");
    };
    msg.and_then(Result::ok)
}

/// Waits until the server closes: a close frame, end of stream, or error.
async fn expect_closed(ws: &mut WsStream) {
    loop {
        match next_message(ws).await {
            Some(Message::Close(_)) | None => return,
            Some(_) => {}
        }
    }
}

/// Echoes everything it reads on one accepted connection.
async fn spawn_echo_upstream() -> SocketAddr {
    let (upstream, upstream_addr) = bind_local().await;
    tokio::spawn(async move {
        let Ok((mut conn, _)) = upstream.accept().await else {
            return;
        };
        let mut buf = vec![0u8; 64 * 1024];
        while let Ok(n) = conn.read(&mut buf).await {
            if n == 0 {
                break;
            }
            if conn.write_all(buf.get(..n).unwrap_or_default()).await.is_err() {
                break;
            }
        }
    });
    upstream_addr
}

async fn http_status(url: &str) -> u16 {
    let Err(WsError::Http(response)) = connect_async(url).await else {
        panic!("expected HTTP rejection from {url}");
    };
    response.status().as_u16()
}

#[tokio::test]
async fn ssh_route_relays_text_both_ways() {
    let (upstream, upstream_addr) = bind_local().await;
    let (addr, sessions) = spawn_gateway(RelayConfig {
        terminal_upstream: upstream_addr.to_string(),
        ..RelayConfig::default()
    })
    .await;

    let mut ws = connect(&format!("ws://{addr}/ssh")).await;
    let mut conn = accept(&upstream).await;

    let Ok(()) = conn.write_all(b"hello\r\n").await else {
        panic!("upstream write failed");
    };
    let Some(Message::Text(text)) = next_message(&mut ws).await else {
        panic!("expected a text frame");
    };
    assert_eq!(text.as_str(), "hello\r\n");

    let Ok(()) = ws.send(Message::text("ls")).await else {
        panic!("websocket send failed");
    };
    let mut buf = [0u8; 2];
    let Ok(Ok(_)) = timeout(TIMEOUT, conn.read_exact(&mut buf)).await else {
        panic!("upstream read failed");
    };
    assert_eq!(&buf, b"ls");
    assert_eq!(sessions.len().await, 1);

    drop(conn);
    expect_closed(&mut ws).await;
}

#[tokio::test]
async fn ssh_route_keeps_split_characters_intact() {
    let (upstream, upstream_addr) = bind_local().await;
    let (addr, _) = spawn_gateway(RelayConfig {
        terminal_upstream: upstream_addr.to_string(),
        ..RelayConfig::default()
    })
    .await;

    let mut ws = connect(&format!("ws://{addr}/ssh")).await;
    let mut conn = accept(&upstream).await;

    // "é" split across two upstream writes
    let _ = conn.write_all(b"caf\xC3").await;
    let _ = conn.flush().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    let _ = conn.write_all(b"\xA9").await;

    let mut received = String::new();
    while received != "café" {
        let Some(Message::Text(text)) = next_message(&mut ws).await else {
            panic!("expected text frames, got {received:?}");
        };
        received.push_str(text.as_str());
    }
}

#[tokio::test]
async fn dial_route_relays_binary() {
    let upstream_addr = spawn_echo_upstream().await;
    let (addr, _) = spawn_gateway(RelayConfig::default()).await;

    let url = format!("ws://{addr}/ws?network=tcp&address={upstream_addr}");
    let mut ws = connect(&url).await;

    let payload = vec![0u8, 1, 2, 0xff, 0x1b];
    let Ok(()) = ws.send(Message::binary(payload.clone())).await else {
        panic!("websocket send failed");
    };
    let Some(Message::Binary(echo)) = next_message(&mut ws).await else {
        panic!("expected a binary frame");
    };
    assert_eq!(echo.to_vec(), payload);
}

#[tokio::test]
async fn dial_route_survives_bulk_echo() {
    const FRAMES: usize = 16;
    const FRAME_LEN: usize = 2 * 1024 * 1024;

    let upstream_addr = spawn_echo_upstream().await;
    let (addr, _) = spawn_gateway(RelayConfig {
        relay_buffer_size: 16 * 1024,
        ..RelayConfig::default()
    })
    .await;

    let url = format!("ws://{addr}/ws?network=tcp&address={upstream_addr}");
    let (mut ws_tx, mut ws_rx) = connect(&url).await.split();

    // Send everything up front while the echoes are read below.
    let sender = tokio::spawn(async move {
        for i in 0..FRAMES {
            let frame = vec![u8::try_from(i % 251).unwrap_or_default(); FRAME_LEN];
            if ws_tx.send(Message::binary(frame)).await.is_err() {
                break;
            }
        }
        ws_tx
    });

    let expected = FRAMES * FRAME_LEN;
    let mut echoed = 0;
    let read_all = async {
        while echoed < expected {
            match ws_rx.next().await {
                Some(Ok(Message::Binary(bytes))) => echoed += bytes.len(),
                Some(Ok(_)) => {}
                Some(Err(_)) | None => break,
            }
        }
    };
    let finished = timeout(Duration::from_secs(30), read_all).await.is_ok();
    assert!(finished, "relay stalled after echoing {echoed} of {expected} bytes");
    assert_eq!(echoed, expected);

    let Ok(Ok(_)) = timeout(TIMEOUT, sender).await else {
        panic!("sender did not finish");
    };
}

#[tokio::test]
async fn dial_route_rejects_bad_queries() {
    let (addr, _) = spawn_gateway(RelayConfig {
        dial_allowlist: vec!["127.0.0.1:5900".to_string()],
        ..RelayConfig::default()
    })
    .await;

    assert_eq!(http_status(&format!("ws://{addr}/ws")).await, 400);
    assert_eq!(
        http_status(&format!("ws://{addr}/ws?network=udp&address=127.0.0.1:5900")).await,
        400
    );
    assert_eq!(
        http_status(&format!("ws://{addr}/ws?network=tcp&address=127.0.0.1:22")).await,
        403
    );
}

#[tokio::test]
async fn disabled_routes_are_not_found() {
    let (addr, _) = spawn_gateway(RelayConfig {
        dial_enabled: false,
        binary_upstream: None,
        ..RelayConfig::default()
    })
    .await;

    assert_eq!(
        http_status(&format!("ws://{addr}/ws?network=tcp&address=127.0.0.1:1")).await,
        404
    );
    assert_eq!(http_status(&format!("ws://{addr}/websockify")).await, 404);
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let (listener, dead_addr) = bind_local().await;
    drop(listener);
    let (addr, sessions) = spawn_gateway(RelayConfig {
        terminal_upstream: dead_addr.to_string(),
        ..RelayConfig::default()
    })
    .await;

    assert_eq!(http_status(&format!("ws://{addr}/ssh")).await, 502);
    assert!(sessions.is_empty().await);
}

#[tokio::test]
async fn session_is_removed_when_client_leaves() {
    let (upstream, upstream_addr) = bind_local().await;
    let (addr, sessions) = spawn_gateway(RelayConfig {
        terminal_upstream: upstream_addr.to_string(),
        ..RelayConfig::default()
    })
    .await;

    let mut ws = connect(&format!("ws://{addr}/ssh")).await;
    let mut conn = accept(&upstream).await;
    let _ = ws.close(None).await;

    // The relay shuts down its upstream half once the client is gone.
    let mut buf = [0u8; 8];
    let Ok(Ok(0)) = timeout(TIMEOUT, conn.read(&mut buf)).await else {
        panic!("expected upstream EOF");
    };

    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while !sessions.is_empty().await {
        assert!(tokio::time::Instant::now() < deadline, "session never removed");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn http_surface_serves_page_health_and_sessions() {
    let (addr, _) = spawn_gateway(RelayConfig::default()).await;

    let Ok(page) = reqwest::get(format!("http://{addr}/")).await else {
        panic!("GET / failed");
    };
    assert_eq!(page.status().as_u16(), 200);
    let Ok(body) = page.text().await else {
        panic!("page body unreadable");
    };
    assert!(body.contains("terminal-container"));

    let Ok(health) = reqwest::get(format!("http://{addr}/health")).await else {
        panic!("GET /health failed");
    };
    let Ok(health) = health.json::<serde_json::Value>().await else {
        panic!("health body is not json");
    };
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["active_sessions"], 0);

    let Ok(list) = reqwest::get(format!("http://{addr}/api/v1/sessions")).await else {
        panic!("GET /api/v1/sessions failed");
    };
    let Ok(list) = list.json::<serde_json::Value>().await else {
        panic!("session list is not json");
    };
    assert_eq!(list["count"], 0);

    let Ok(doc) = reqwest::get(format!("http://{addr}/api-docs/openapi.json")).await else {
        panic!("GET openapi failed");
    };
    assert_eq!(doc.status().as_u16(), 200);
}
