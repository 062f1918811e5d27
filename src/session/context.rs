//! Session context
//!
//! Identity and plumbing for one client connection, created after the
//! WebSocket upgrade and owned by the connection's read loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

/// Per-connection session state
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Unique session ID
    pub session_id: u64,

    /// Remote peer address
    pub peer_addr: SocketAddr,

    /// When the session was established
    pub connected_at: Instant,

    /// This connection's own outbound queue, for unicast replies
    pub outbound: mpsc::Sender<Arc<String>>,

    /// Text frames received over the session lifetime
    pub events_received: u64,
}

impl SessionContext {
    /// Create a new context
    pub fn new(session_id: u64, peer_addr: SocketAddr, outbound: mpsc::Sender<Arc<String>>) -> Self {
        Self {
            session_id,
            peer_addr,
            connected_at: Instant::now(),
            outbound,
            events_received: 0,
        }
    }

    /// How long the session has been up
    pub fn uptime(&self) -> Duration {
        self.connected_at.elapsed()
    }
}
