//! Inbound event routing
//!
//! One [`EventRouter`] is shared across connection tasks. For each text
//! frame it parses the envelope, applies the registry mutation the event
//! calls for, and fans the frame out to the computed recipients. Payloads
//! are relayed as received; the router inspects only the `event` name and
//! the `data.room` field.

use std::sync::Arc;

use serde_json::Value;

use crate::protocol::{Envelope, EventKind};
use crate::registry::{Recipient, RoomRegistry};

use super::context::SessionContext;

/// What the connection loop should do after a frame is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Keep reading frames
    Continue,
    /// Close the connection at the client's request
    Disconnect,
}

/// Routes parsed events to registry mutations and fan-out
pub struct EventRouter {
    registry: Arc<RoomRegistry>,
}

impl EventRouter {
    /// Create a router backed by the given registry
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Handle one inbound text frame
    ///
    /// Unparseable frames and unknown event names are dropped without
    /// disturbing the session; the relay never replies with an error.
    pub async fn handle_frame(&self, ctx: &SessionContext, raw: &str) -> RouteOutcome {
        let envelope = match Envelope::parse(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(
                    session_id = ctx.session_id,
                    error = %e,
                    "Ignoring unparseable frame"
                );
                return RouteOutcome::Continue;
            }
        };

        let Some(kind) = EventKind::from_name(&envelope.event) else {
            tracing::debug!(
                session_id = ctx.session_id,
                event = %envelope.event,
                "Ignoring unknown event"
            );
            return RouteOutcome::Continue;
        };
        self.registry.stats().record_event();

        match kind {
            EventKind::Join => self.handle_join(ctx, &envelope).await,
            EventKind::Leave => self.handle_leave(ctx, &envelope).await,
            EventKind::Disconnect => {
                tracing::debug!(session_id = ctx.session_id, "Disconnect requested");
                return RouteOutcome::Disconnect;
            }
            playback => self.handle_playback(ctx, playback, &envelope).await,
        }

        RouteOutcome::Continue
    }

    /// `join`: add the sender to the room, announce it, replay cached state
    async fn handle_join(&self, ctx: &SessionContext, envelope: &Envelope) {
        let Some(room) = envelope.room() else {
            tracing::debug!(session_id = ctx.session_id, "Join without a room name dropped");
            return;
        };

        let outcome = self.registry.join(ctx.session_id, room).await;

        // Peers learn of the join by room name alone
        let announce = Envelope::new(EventKind::Join.name(), Value::String(room.to_string()));
        self.fan_out(ctx.session_id, &announce, &outcome.recipients);

        // The joiner alone gets the room's cached state, as a `src` event
        if let Some(state) = outcome.snapshot {
            let replay = Envelope::new(EventKind::Src.name(), state);
            let frame = Arc::new(replay.to_frame());
            match ctx.outbound.try_send(frame) {
                Ok(()) => self.registry.stats().record_broadcast(1),
                Err(_) => {
                    tracing::warn!(
                        session_id = ctx.session_id,
                        room = %room,
                        "Failed to queue state replay"
                    );
                    self.registry.stats().record_dropped(1);
                }
            }
        }
    }

    /// `leave`: drop the membership, then re-broadcast the frame as received
    ///
    /// The recipient set is computed after the removal, so a client leaving
    /// its only room announces the departure to nobody.
    async fn handle_leave(&self, ctx: &SessionContext, envelope: &Envelope) {
        let Some(room) = envelope.room() else {
            tracing::debug!(session_id = ctx.session_id, "Leave without a room name dropped");
            return;
        };

        let recipients = self.registry.leave(ctx.session_id, room).await;
        self.fan_out(ctx.session_id, envelope, &recipients);
    }

    /// `play`/`pause`/`seek`/`src`: cache the payload, relay it untouched
    async fn handle_playback(&self, ctx: &SessionContext, kind: EventKind, envelope: &Envelope) {
        let payload = envelope.data.clone().unwrap_or(Value::Null);
        let recipients = self.registry.apply_state(ctx.session_id, &payload).await;

        tracing::debug!(
            session_id = ctx.session_id,
            event = %kind,
            payload = %payload,
            recipients = recipients.len(),
            "Playback event"
        );

        self.fan_out(ctx.session_id, envelope, &recipients);
    }

    /// Serialize once and push the frame onto every recipient queue
    ///
    /// `try_send` keeps one slow consumer from stalling the rest; a full or
    /// closed queue costs that recipient the frame and nothing more.
    fn fan_out(&self, sender_id: u64, envelope: &Envelope, recipients: &[Recipient]) {
        if recipients.is_empty() {
            return;
        }

        let frame = Arc::new(envelope.to_frame());
        let mut delivered: u64 = 0;
        let mut dropped: u64 = 0;

        for recipient in recipients {
            match recipient.sender.try_send(Arc::clone(&frame)) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    dropped += 1;
                    tracing::warn!(
                        event = %envelope.event,
                        from = sender_id,
                        to = recipient.conn_id,
                        "Recipient queue full or closed, frame dropped"
                    );
                }
            }
        }

        self.registry.stats().record_broadcast(delivered);
        if dropped > 0 {
            self.registry.stats().record_dropped(dropped);
        }

        tracing::trace!(
            event = %envelope.event,
            from = sender_id,
            delivered,
            dropped,
            "Event fanned out"
        );
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;

    fn test_ctx(session_id: u64, outbound: mpsc::Sender<Arc<String>>) -> SessionContext {
        SessionContext::new(session_id, "127.0.0.1:9".parse().unwrap(), outbound)
    }

    async fn register_conn(
        registry: &Arc<RoomRegistry>,
        conn_id: u64,
    ) -> (SessionContext, mpsc::Receiver<Arc<String>>) {
        let (tx, rx) = mpsc::channel(8);
        registry.register(conn_id, tx.clone()).await;
        (test_ctx(conn_id, tx), rx)
    }

    fn recv_envelope(rx: &mut mpsc::Receiver<Arc<String>>) -> Envelope {
        let frame = rx.try_recv().expect("expected a queued frame");
        Envelope::parse(&frame).unwrap()
    }

    #[tokio::test]
    async fn test_join_announces_to_room() {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(Arc::clone(&registry));
        let (_peer, mut peer_rx) = register_conn(&registry, 1).await;
        let (joiner, mut joiner_rx) = register_conn(&registry, 2).await;
        registry.join(1, "reef").await;

        let outcome = router
            .handle_frame(&joiner, r#"{"event":"join","data":{"room":"reef"}}"#)
            .await;

        assert_eq!(outcome, RouteOutcome::Continue);
        let announce = recv_envelope(&mut peer_rx);
        assert_eq!(announce.event, "join");
        assert_eq!(announce.data, Some(json!("reef")));
        // No cached state yet, so the joiner hears nothing
        assert!(joiner_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_join_replays_cached_state() {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(Arc::clone(&registry));
        let payload = json!({"videoSrc": "reef.mp4", "progress": 42.0, "playing": true});
        registry.set_state("reef", payload.clone()).await;
        let (joiner, mut joiner_rx) = register_conn(&registry, 1).await;

        router
            .handle_frame(&joiner, r#"{"event":"join","data":{"room":"reef"}}"#)
            .await;

        let replay = recv_envelope(&mut joiner_rx);
        assert_eq!(replay.event, "src");
        assert_eq!(replay.data, Some(payload));
        assert_eq!(registry.stats().snapshot().frames_broadcast, 1);
    }

    #[tokio::test]
    async fn test_playback_updates_and_fans_out() {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(Arc::clone(&registry));
        let (sender, mut sender_rx) = register_conn(&registry, 1).await;
        let (_peer, mut peer_rx) = register_conn(&registry, 2).await;
        registry.join(1, "reef").await;
        registry.join(2, "reef").await;

        let raw = r#"{"event":"play","data":{"videoSrc":"reef.mp4","progress":2.5,"playing":true,"extra":"kept"}}"#;
        router.handle_frame(&sender, raw).await;

        // State cached wholesale, extra fields included
        let cached = registry.state("reef").await.unwrap();
        assert_eq!(cached["extra"], json!("kept"));

        let relayed = recv_envelope(&mut peer_rx);
        assert_eq!(relayed, Envelope::parse(raw).unwrap());
        // The sender never hears its own event
        assert!(sender_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_leave_rebroadcasts_payload_verbatim() {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(Arc::clone(&registry));
        let (leaver, _leaver_rx) = register_conn(&registry, 1).await;
        let (_a_peer, mut a_rx) = register_conn(&registry, 2).await;
        let (_b_peer, mut b_rx) = register_conn(&registry, 3).await;
        registry.join(1, "a").await;
        registry.join(1, "b").await;
        registry.join(2, "a").await;
        registry.join(3, "b").await;

        let raw = r#"{"event":"leave","data":{"room":"a","reason":"bye"}}"#;
        router.handle_frame(&leaver, raw).await;

        // Membership is gone before the broadcast: only room "b" still
        // connects the leaver to anyone
        assert!(a_rx.try_recv().is_err());
        let heard = recv_envelope(&mut b_rx);
        assert_eq!(heard, Envelope::parse(raw).unwrap());
        assert!(!registry.members("a").await.contains(&1));
    }

    #[tokio::test]
    async fn test_leave_sole_room_reaches_nobody() {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(Arc::clone(&registry));
        let (leaver, _leaver_rx) = register_conn(&registry, 1).await;
        let (_peer, mut peer_rx) = register_conn(&registry, 2).await;
        registry.join(1, "reef").await;
        registry.join(2, "reef").await;

        router
            .handle_frame(&leaver, r#"{"event":"leave","data":{"room":"reef"}}"#)
            .await;

        assert!(peer_rx.try_recv().is_err());
        assert_eq!(registry.members("reef").await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_event_is_ignored() {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(Arc::clone(&registry));
        let (ctx, _rx) = register_conn(&registry, 1).await;

        let outcome = router
            .handle_frame(&ctx, r#"{"event":"shout","data":{"room":"reef"}}"#)
            .await;

        assert_eq!(outcome, RouteOutcome::Continue);
        assert_eq!(registry.stats().snapshot().events_received, 0);
    }

    #[tokio::test]
    async fn test_unparseable_frame_is_ignored() {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(Arc::clone(&registry));
        let (ctx, _rx) = register_conn(&registry, 1).await;

        let outcome = router.handle_frame(&ctx, "not json").await;

        assert_eq!(outcome, RouteOutcome::Continue);
        assert_eq!(registry.stats().snapshot().events_received, 0);
    }

    #[tokio::test]
    async fn test_join_without_room_is_dropped() {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(Arc::clone(&registry));
        let (ctx, _rx) = register_conn(&registry, 1).await;

        router
            .handle_frame(&ctx, r#"{"event":"join","data":{}}"#)
            .await;

        assert!(registry.joined_rooms(1).await.is_empty());
        // Counted as a received event, unlike an unknown name
        assert_eq!(registry.stats().snapshot().events_received, 1);
    }

    #[tokio::test]
    async fn test_disconnect_outcome() {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(Arc::clone(&registry));
        let (ctx, _rx) = register_conn(&registry, 1).await;

        let outcome = router.handle_frame(&ctx, r#"{"event":"disconnect"}"#).await;

        assert_eq!(outcome, RouteOutcome::Disconnect);
    }

    #[tokio::test]
    async fn test_full_queue_drops_frame_without_blocking() {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(Arc::clone(&registry));
        let (sender, _sender_rx) = register_conn(&registry, 1).await;

        // Peer with a single-slot queue, already full
        let (peer_tx, mut peer_rx) = mpsc::channel(1);
        registry.register(2, peer_tx.clone()).await;
        peer_tx.try_send(Arc::new("stale".to_string())).unwrap();

        registry.join(1, "reef").await;
        registry.join(2, "reef").await;

        let outcome = router
            .handle_frame(&sender, r#"{"event":"pause","data":{"playing":false}}"#)
            .await;

        assert_eq!(outcome, RouteOutcome::Continue);
        assert_eq!(registry.stats().snapshot().frames_dropped, 1);
        // Only the pre-existing frame sits in the queue
        assert_eq!(*peer_rx.try_recv().unwrap(), "stale");
        assert!(peer_rx.try_recv().is_err());
    }
}
