//! Statistics for the relay
//!
//! Counters live behind relaxed atomics because they are bumped from many
//! connection tasks at once; `snapshot()` returns a plain struct for
//! display.

use std::sync::atomic::{AtomicU64, Ordering};

/// Relay-wide counters
///
/// Owned by the registry and shared by reference wherever events are
/// counted.
#[derive(Debug, Default)]
pub struct RelayStats {
    /// Total connections ever accepted
    connections_total: AtomicU64,
    /// Currently registered connections
    connections_active: AtomicU64,
    /// Events received and routed
    events_received: AtomicU64,
    /// Frames delivered to recipient queues
    frames_broadcast: AtomicU64,
    /// Frames dropped because a recipient queue was full or gone
    frames_dropped: AtomicU64,
    /// Rooms created (by join or by an early state write)
    rooms_created: AtomicU64,
    /// Rooms deleted by the reaper
    rooms_reaped: AtomicU64,
}

impl RelayStats {
    /// Create a zeroed counter set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_connection(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_disconnect(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_event(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broadcast(&self, delivered: u64) {
        self.frames_broadcast.fetch_add(delivered, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, dropped: u64) {
        self.frames_dropped.fetch_add(dropped, Ordering::Relaxed);
    }

    pub fn record_room_created(&self) {
        self.rooms_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_room_reaped(&self) {
        self.rooms_reaped.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough view of the counters for display
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            events_received: self.events_received.load(Ordering::Relaxed),
            frames_broadcast: self.frames_broadcast.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            rooms_created: self.rooms_created.load(Ordering::Relaxed),
            rooms_reaped: self.rooms_reaped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the relay counters
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub connections_total: u64,
    pub connections_active: u64,
    pub events_received: u64,
    pub frames_broadcast: u64,
    pub frames_dropped: u64,
    pub rooms_created: u64,
    pub rooms_reaped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_starts_zeroed() {
        let stats = RelayStats::new();
        let snap = stats.snapshot();

        assert_eq!(snap.connections_total, 0);
        assert_eq!(snap.connections_active, 0);
        assert_eq!(snap.events_received, 0);
        assert_eq!(snap.frames_broadcast, 0);
        assert_eq!(snap.frames_dropped, 0);
        assert_eq!(snap.rooms_created, 0);
        assert_eq!(snap.rooms_reaped, 0);
    }

    #[test]
    fn test_connection_counters() {
        let stats = RelayStats::new();

        stats.record_connection();
        stats.record_connection();
        stats.record_disconnect();

        let snap = stats.snapshot();
        assert_eq!(snap.connections_total, 2);
        assert_eq!(snap.connections_active, 1);
    }

    #[test]
    fn test_broadcast_counters() {
        let stats = RelayStats::new();

        stats.record_event();
        stats.record_broadcast(3);
        stats.record_dropped(1);

        let snap = stats.snapshot();
        assert_eq!(snap.events_received, 1);
        assert_eq!(snap.frames_broadcast, 3);
        assert_eq!(snap.frames_dropped, 1);
    }

    #[test]
    fn test_room_counters() {
        let stats = RelayStats::new();

        stats.record_room_created();
        stats.record_room_created();
        stats.record_room_reaped();

        let snap = stats.snapshot();
        assert_eq!(snap.rooms_created, 2);
        assert_eq!(snap.rooms_reaped, 1);
    }
}
