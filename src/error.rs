//! Error types for the relay
//!
//! Connection-level failures end that session only; registry operations are
//! infallible and return values instead of results.

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RelayError>;

/// Error type for relay operations
#[derive(Debug)]
pub enum RelayError {
    /// I/O failure on the listener or a connection socket
    Io(std::io::Error),
    /// WebSocket handshake or protocol failure
    Transport(tokio_tungstenite::tungstenite::Error),
    /// Text frame that could not be decoded as an event envelope
    InvalidFrame(String),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::Io(e) => write!(f, "I/O error: {}", e),
            RelayError::Transport(e) => write!(f, "Transport error: {}", e),
            RelayError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Io(e) => Some(e),
            RelayError::Transport(e) => Some(e),
            RelayError::InvalidFrame(_) => None,
        }
    }
}

impl From<std::io::Error> for RelayError {
    fn from(e: std::io::Error) -> Self {
        RelayError::Io(e)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for RelayError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        RelayError::Transport(e)
    }
}
