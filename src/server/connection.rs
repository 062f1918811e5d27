//! Per-connection handling
//!
//! Upgrades an accepted socket to a WebSocket, registers it with the room
//! registry, and pumps frames in both directions: a writer task drains the
//! connection's outbound queue while the read loop feeds inbound text
//! frames to the router.

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;

use crate::error::Result;
use crate::registry::RoomRegistry;
use crate::server::config::ServerConfig;
use crate::session::{EventRouter, RouteOutcome, SessionContext};

/// One accepted client connection
pub(crate) struct Connection {
    session_id: u64,
    socket: TcpStream,
    peer_addr: SocketAddr,
    config: ServerConfig,
    registry: Arc<RoomRegistry>,
}

impl Connection {
    pub(crate) fn new(
        session_id: u64,
        socket: TcpStream,
        peer_addr: SocketAddr,
        config: ServerConfig,
        registry: Arc<RoomRegistry>,
    ) -> Self {
        Self {
            session_id,
            socket,
            peer_addr,
            config,
            registry,
        }
    }

    /// Drive the connection from upgrade to close
    pub(crate) async fn run(self) -> Result<()> {
        let Self {
            session_id,
            socket,
            peer_addr,
            config,
            registry,
        } = self;

        let ws = accept_hdr_async(socket, |req: &Request, response: Response| {
            let origin = req.headers().get("origin").and_then(|v| v.to_str().ok());
            if config.origin_allowed(origin) {
                Ok(response)
            } else {
                tracing::warn!(
                    session_id = session_id,
                    origin = origin.unwrap_or("<none>"),
                    "Upgrade rejected: origin not allowed"
                );
                let mut reject = ErrorResponse::new(Some("origin not allowed".to_string()));
                *reject.status_mut() = StatusCode::FORBIDDEN;
                Err(reject)
            }
        })
        .await?;

        let (outbound_tx, mut outbound_rx) =
            mpsc::channel::<Arc<String>>(registry.config().outbound_capacity);
        registry.register(session_id, outbound_tx.clone()).await;

        let (mut sink, mut stream) = ws.split();

        // Writer task: drains the outbound queue into the socket
        let writer = tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                if sink.send(Message::text(frame.as_str())).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let mut ctx = SessionContext::new(session_id, peer_addr, outbound_tx);
        let router = EventRouter::new(Arc::clone(&registry));

        while let Some(message) = stream.next().await {
            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    tracing::debug!(session_id = session_id, error = %e, "Read error");
                    break;
                }
            };

            match message {
                Message::Text(text) => {
                    ctx.events_received += 1;
                    if router.handle_frame(&ctx, text.as_str()).await == RouteOutcome::Disconnect {
                        break;
                    }
                }
                Message::Close(_) => break,
                // Pings are answered by the protocol layer during polling
                Message::Ping(_) | Message::Pong(_) => {}
                Message::Binary(_) => {
                    tracing::debug!(session_id = session_id, "Ignoring binary frame");
                }
                _ => {}
            }
        }

        let events = ctx.events_received;
        let duration = ctx.uptime();

        registry.unregister(session_id).await;

        // Dropping the context releases the last queue sender, which lets
        // the writer drain and exit
        drop(ctx);
        let _ = writer.await;

        tracing::debug!(
            session_id = session_id,
            peer = %peer_addr,
            events = events,
            duration_secs = duration.as_secs(),
            "Session ended"
        );

        Ok(())
    }
}
