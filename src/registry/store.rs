//! Room registry implementation
//!
//! The central registry that tracks live connections, room membership, and
//! each room's last-known playback state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, RwLock};

use crate::stats::RelayStats;

use super::config::RegistryConfig;
use super::entry::{ConnectionEntry, Recipient, RoomEntry, RoomInfo};

/// Everything guarded by the registry lock
///
/// Connections and rooms are mutated together so the bidirectional
/// membership invariant holds at every lock release: a connection's room
/// set and the rooms' member sets always agree.
struct RegistryInner {
    connections: HashMap<u64, ConnectionEntry>,
    rooms: HashMap<String, RoomEntry>,
}

/// Result of a join, computed in one lock acquisition
pub struct JoinOutcome {
    /// Whether this join created the room entry
    pub created_room: bool,

    /// Whether the connection was not already a member
    ///
    /// A repeated join leaves membership untouched but still produces
    /// recipients and a snapshot, matching how clients re-announce
    /// themselves after a reconnect.
    pub newly_joined: bool,

    /// Other members of every room the connection now belongs to
    pub recipients: Vec<Recipient>,

    /// Cached state of the joined room, to replay to the joiner
    pub snapshot: Option<Value>,
}

impl JoinOutcome {
    fn empty() -> Self {
        Self {
            created_room: false,
            newly_joined: false,
            recipients: Vec::new(),
            snapshot: None,
        }
    }
}

/// Central registry for connections and rooms
///
/// Thread-safe via a single `RwLock`; recipient sets are computed under
/// the same acquisition as the mutation they accompany, and the actual
/// sends happen outside the lock.
pub struct RoomRegistry {
    inner: RwLock<RegistryInner>,

    /// Configuration
    config: RegistryConfig,

    /// Relay-wide counters
    stats: RelayStats,
}

impl RoomRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                connections: HashMap::new(),
                rooms: HashMap::new(),
            }),
            config,
            stats: RelayStats::new(),
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get the relay counters
    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Register a connection with an empty membership set
    pub async fn register(&self, conn_id: u64, sender: mpsc::Sender<Arc<String>>) {
        let mut inner = self.inner.write().await;
        inner.connections.insert(conn_id, ConnectionEntry::new(sender));
        self.stats.record_connection();

        tracing::debug!(conn_id, "Connection registered");
    }

    /// Remove a connection and cascade it out of every room
    ///
    /// Rooms left empty stay in the table until the reaper sweeps them.
    /// Idempotent.
    pub async fn unregister(&self, conn_id: u64) {
        let mut inner = self.inner.write().await;

        if let Some(entry) = inner.connections.remove(&conn_id) {
            for room in &entry.rooms {
                if let Some(room_entry) = inner.rooms.get_mut(room) {
                    room_entry.members.remove(&conn_id);
                }
            }
            self.stats.record_disconnect();

            tracing::debug!(
                conn_id,
                rooms = entry.rooms.len(),
                "Connection unregistered"
            );
        }
    }

    /// Add a connection to a room, creating the room if absent
    ///
    /// Membership is mutated first, so the returned recipients include the
    /// joined room's other members.
    pub async fn join(&self, conn_id: u64, room: &str) -> JoinOutcome {
        let mut inner = self.inner.write().await;

        let Some(conn) = inner.connections.get_mut(&conn_id) else {
            tracing::debug!(conn_id, room = %room, "Join from unknown connection ignored");
            return JoinOutcome::empty();
        };
        let newly_joined = conn.rooms.insert(room.to_string());

        let created_room = !inner.rooms.contains_key(room);
        let entry = inner
            .rooms
            .entry(room.to_string())
            .or_insert_with(RoomEntry::new);
        entry.members.insert(conn_id);
        let snapshot = entry.state.clone();
        let members = entry.members.len();

        if created_room {
            self.stats.record_room_created();
            tracing::info!(room = %room, "Room created");
        }
        tracing::debug!(room = %room, conn_id, members, "Member joined");

        JoinOutcome {
            created_room,
            newly_joined,
            recipients: Self::recipients_locked(&inner, conn_id),
            snapshot,
        }
    }

    /// Remove a connection from a room
    ///
    /// Membership is removed first, so the returned recipients cover only
    /// the rooms the connection still belongs to. Absent membership is a
    /// no-op; the room entry survives even when left empty.
    pub async fn leave(&self, conn_id: u64, room: &str) -> Vec<Recipient> {
        let mut inner = self.inner.write().await;

        let Some(conn) = inner.connections.get_mut(&conn_id) else {
            return Vec::new();
        };
        let was_member = conn.rooms.remove(room);

        if let Some(entry) = inner.rooms.get_mut(room) {
            entry.members.remove(&conn_id);
        }

        if was_member {
            tracing::debug!(room = %room, conn_id, "Member left");
        }

        Self::recipients_locked(&inner, conn_id)
    }

    /// Get a room's cached playback payload
    pub async fn state(&self, room: &str) -> Option<Value> {
        let inner = self.inner.read().await;
        inner.rooms.get(room).and_then(|entry| entry.state.clone())
    }

    /// Overwrite a room's cached payload, creating the room if absent
    ///
    /// State can arrive before anyone joins; the room entry is created
    /// empty in that case and lives until the reaper finds it memberless.
    pub async fn set_state(&self, room: &str, payload: Value) {
        let mut inner = self.inner.write().await;

        let created_room = !inner.rooms.contains_key(room);
        let entry = inner
            .rooms
            .entry(room.to_string())
            .or_insert_with(RoomEntry::new);
        entry.state = Some(payload);

        if created_room {
            self.stats.record_room_created();
            tracing::info!(room = %room, "Room created (state before first join)");
        }
    }

    /// Overwrite the cached state of every room the sender belongs to
    ///
    /// Returns the deduplicated union of other members across those rooms,
    /// computed in the same lock acquisition as the overwrite.
    pub async fn apply_state(&self, conn_id: u64, payload: &Value) -> Vec<Recipient> {
        let mut inner = self.inner.write().await;

        let Some(conn) = inner.connections.get(&conn_id) else {
            return Vec::new();
        };
        let rooms: Vec<String> = conn.rooms.iter().cloned().collect();

        for room in &rooms {
            if let Some(entry) = inner.rooms.get_mut(room) {
                entry.state = Some(payload.clone());
            }
        }

        Self::recipients_locked(&inner, conn_id)
    }

    /// Get a room's member set (empty if the room is absent)
    pub async fn members(&self, room: &str) -> HashSet<u64> {
        let inner = self.inner.read().await;
        inner
            .rooms
            .get(room)
            .map(|entry| entry.members.clone())
            .unwrap_or_default()
    }

    /// Whether a room has no members (true if the room is absent)
    pub async fn is_empty(&self, room: &str) -> bool {
        let inner = self.inner.read().await;
        inner
            .rooms
            .get(room)
            .map(|entry| entry.members.is_empty())
            .unwrap_or(true)
    }

    /// Point-in-time facts about a room
    pub async fn room_info(&self, room: &str) -> Option<RoomInfo> {
        let inner = self.inner.read().await;
        inner.rooms.get(room).map(|entry| RoomInfo {
            member_count: entry.member_count(),
            has_state: entry.has_state(),
        })
    }

    /// Rooms a connection currently belongs to
    pub async fn joined_rooms(&self, conn_id: u64) -> Vec<String> {
        let inner = self.inner.read().await;
        inner
            .connections
            .get(&conn_id)
            .map(|conn| conn.rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Names of all rooms currently in the table
    pub async fn rooms(&self) -> Vec<String> {
        self.inner.read().await.rooms.keys().cloned().collect()
    }

    /// Total number of registered connections
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }

    /// Total number of rooms, empty ones included
    pub async fn room_count(&self) -> usize {
        self.inner.read().await.rooms.len()
    }

    /// Remove a room outright, discarding its cached state
    ///
    /// Any remaining members are scrubbed from the room so the membership
    /// invariant survives. Returns whether the room existed.
    pub async fn delete(&self, room: &str) -> bool {
        let mut inner = self.inner.write().await;

        match inner.rooms.remove(room) {
            Some(entry) => {
                for member in &entry.members {
                    if let Some(conn) = inner.connections.get_mut(member) {
                        conn.rooms.remove(room);
                    }
                }
                tracing::debug!(room = %room, "Room deleted");
                true
            }
            None => false,
        }
    }

    /// Run one reaper sweep
    ///
    /// Deletes every room with no members, cached state included. This is
    /// the only path by which an abandoned room disappears; departures and
    /// disconnects leave the entry in place so a quick reconnect still
    /// finds the state.
    pub async fn sweep_empty_rooms(&self) -> usize {
        let mut inner = self.inner.write().await;

        let victims: Vec<String> = inner
            .rooms
            .iter()
            .filter(|(_, entry)| entry.members.is_empty())
            .map(|(room, _)| room.clone())
            .collect();

        for room in &victims {
            if let Some(entry) = inner.rooms.remove(room) {
                self.stats.record_room_reaped();
                tracing::info!(
                    room = %room,
                    had_state = entry.has_state(),
                    "Room reaped"
                );
            }
        }

        victims.len()
    }

    /// Spawn the background reaper task
    ///
    /// Returns a handle that can be used to abort the task.
    pub fn spawn_reaper_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);
        let interval = registry.config.reaper_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                registry.sweep_empty_rooms().await;
            }
        })
    }

    /// Other members of every room `conn_id` belongs to, deduplicated
    ///
    /// Must be called with the lock held; the sender itself is never a
    /// recipient.
    fn recipients_locked(inner: &RegistryInner, conn_id: u64) -> Vec<Recipient> {
        let Some(conn) = inner.connections.get(&conn_id) else {
            return Vec::new();
        };

        let mut seen: HashSet<u64> = HashSet::new();
        let mut recipients = Vec::new();

        for room in &conn.rooms {
            if let Some(entry) = inner.rooms.get(room) {
                for &member in &entry.members {
                    if member != conn_id && seen.insert(member) {
                        if let Some(peer) = inner.connections.get(&member) {
                            recipients.push(Recipient {
                                conn_id: member,
                                sender: peer.sender.clone(),
                            });
                        }
                    }
                }
            }
        }

        recipients
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
