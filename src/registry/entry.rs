//! Connection and room entries
//!
//! This module defines the per-connection and per-room state stored in the
//! registry.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::mpsc;

/// Entry for a single live connection
pub struct ConnectionEntry {
    /// Outbound frame queue, drained by the connection's writer task
    pub sender: mpsc::Sender<Arc<String>>,

    /// Rooms this connection currently belongs to
    pub rooms: HashSet<String>,

    /// When the connection registered
    pub registered_at: Instant,
}

impl ConnectionEntry {
    pub(super) fn new(sender: mpsc::Sender<Arc<String>>) -> Self {
        Self {
            sender,
            rooms: HashSet::new(),
            registered_at: Instant::now(),
        }
    }

    /// Number of rooms this connection belongs to
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

/// Entry for a single room
pub struct RoomEntry {
    /// Connection ids of the current members
    pub members: HashSet<u64>,

    /// Last-known playback payload, verbatim as received
    ///
    /// Absent until the first stateful event touches the room. Replaced
    /// wholesale on every such event; the relay never merges payloads.
    pub state: Option<Value>,

    /// When the room was created
    pub created_at: Instant,
}

impl RoomEntry {
    pub(super) fn new() -> Self {
        Self {
            members: HashSet::new(),
            state: None,
            created_at: Instant::now(),
        }
    }

    /// Number of current members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Whether any playback state has been cached
    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }
}

/// Delivery handle for one broadcast recipient
///
/// Cloned out of the registry under the lock; the actual send happens
/// outside it.
#[derive(Clone)]
pub struct Recipient {
    /// Connection id, for logging delivery failures
    pub conn_id: u64,

    /// The recipient's outbound queue
    pub sender: mpsc::Sender<Arc<String>>,
}

/// Point-in-time facts about a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    /// Number of current members
    pub member_count: usize,
    /// Whether playback state has been cached
    pub has_state: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_entry_starts_roomless() {
        let (tx, _rx) = mpsc::channel(4);
        let entry = ConnectionEntry::new(tx);

        assert_eq!(entry.room_count(), 0);
    }

    #[test]
    fn test_room_entry_starts_empty() {
        let entry = RoomEntry::new();

        assert_eq!(entry.member_count(), 0);
        assert!(!entry.has_state());
    }

    #[test]
    fn test_room_entry_has_state_after_write() {
        let mut entry = RoomEntry::new();
        entry.state = Some(serde_json::json!({"videoSrc": "reef.mp4"}));

        assert!(entry.has_state());
        assert_eq!(entry.member_count(), 0);
    }
}
