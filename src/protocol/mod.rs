//! Wire protocol for the relay
//!
//! Every message is a single JSON object carried in one WebSocket text
//! frame:
//!
//! ```text
//! {"event": "play", "data": {"playing": true, "progress": 12.5, "videoSrc": "reef.mp4"}}
//! ```
//!
//! The relay inspects only the `event` name and, for `join`/`leave`, the
//! `room` field of `data`. Playback payloads are cached and re-broadcast
//! verbatim, so clients are free to extend them without a server change.
//! [`RoomState`] is the typed view of a well-formed playback payload; the
//! registry itself stores raw JSON.

pub mod envelope;
pub mod event;
pub mod state;

pub use envelope::Envelope;
pub use event::EventKind;
pub use state::RoomState;
