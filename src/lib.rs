//! # roomcast
//!
//! Room-scoped broadcast relay for keeping video playback in sync across
//! viewers.
//!
//! Clients connect over WebSocket, join named rooms, and exchange playback
//! events (`play`, `pause`, `seek`, `src`). The relay fans each event out
//! to the sender's room peers, caches the last payload per room so late
//! joiners can catch up, and reaps rooms once everyone has left.
//!
//! - JSON text-frame protocol: `{"event": ..., "data": ...}`
//! - Per-room last-known-state cache, replayed to joiners as a `src` event
//! - Fan-out through bounded per-connection queues; a slow peer loses only
//!   its own frames
//! - Background reaper deletes rooms with no members
//!
//! # Example
//!
//! ```no_run
//! use roomcast::{RelayServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> roomcast::Result<()> {
//!     let server = RelayServer::new(ServerConfig::default());
//!     server.run().await
//! }
//! ```

pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod stats;

pub use error::{RelayError, Result};
pub use protocol::{Envelope, EventKind, RoomState};
pub use registry::{RegistryConfig, RoomRegistry};
pub use server::{RelayServer, ServerConfig};
pub use stats::{RelayStats, StatsSnapshot};
