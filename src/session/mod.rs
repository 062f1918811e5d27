//! Client session handling
//!
//! A session begins when a WebSocket upgrade completes and ends when the
//! socket closes. The [`SessionContext`] carries the connection's identity
//! and its outbound queue; the [`EventRouter`] interprets inbound frames
//! and turns them into registry mutations and fan-out.

pub mod context;
pub mod router;

pub use context::SessionContext;
pub use router::{EventRouter, RouteOutcome};
