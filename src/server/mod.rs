//! WebSocket relay server
//!
//! [`RelayServer`] owns the listener, the room registry, and the
//! connection tasks. Each accepted socket is upgraded to a WebSocket and
//! driven until either side closes it.

mod connection;

pub mod config;
pub mod listener;

pub use config::ServerConfig;
pub use listener::RelayServer;
