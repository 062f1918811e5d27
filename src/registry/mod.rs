//! Room registry for membership and fan-out routing
//!
//! The registry owns the two shared maps of the relay: live connections and
//! the rooms they have joined. Every membership mutation also computes the
//! recipients of the broadcast it triggers, under the same lock acquisition,
//! so a recipient set can never observe a half-applied change.
//!
//! # Architecture
//!
//! ```text
//!                         Arc<RoomRegistry>
//!                  ┌────────────────────────────┐
//!                  │ connections: HashMap<u64,  │
//!                  │   ConnectionEntry {        │
//!                  │     sender, rooms,         │
//!                  │   }>                       │
//!                  │ rooms: HashMap<String,     │
//!                  │   RoomEntry {              │
//!                  │     members, state,        │
//!                  │   }>                       │
//!                  └─────────────┬──────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            │                   │                   │
//!            ▼                   ▼                   ▼
//!       [EventRouter]       [EventRouter]        [Reaper]
//!       join / leave        apply_state         sweep_empty_rooms
//!            │                   │
//!            └──► Recipient.sender.try_send() ──► writer task ──► WebSocket
//! ```
//!
//! # Delivery Design
//!
//! A frame is serialized once per event and shared as `Arc<String>`. The
//! registry hands out cloned queue senders; the router pushes to them
//! outside the lock. A full or closed queue drops that one recipient's
//! frame, nothing more.

pub mod config;
pub mod entry;
pub mod store;

pub use config::RegistryConfig;
pub use entry::{ConnectionEntry, Recipient, RoomEntry, RoomInfo};
pub use store::{JoinOutcome, RoomRegistry};
