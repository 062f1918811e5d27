//! Event names understood by the relay

/// Events the relay routes
///
/// Anything not listed here is dropped on receipt; the relay never errors
/// on an unknown event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Enter a room (`data.room` names it)
    Join,
    /// Exit a room (`data.room` names it)
    Leave,
    /// Playback started
    Play,
    /// Playback paused
    Pause,
    /// Playhead moved
    Seek,
    /// Video source changed; also the name of the snapshot sent to joiners
    Src,
    /// Client requests the connection be closed
    Disconnect,
}

impl EventKind {
    /// Look up an event by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "join" => Some(EventKind::Join),
            "leave" => Some(EventKind::Leave),
            "play" => Some(EventKind::Play),
            "pause" => Some(EventKind::Pause),
            "seek" => Some(EventKind::Seek),
            "src" => Some(EventKind::Src),
            "disconnect" => Some(EventKind::Disconnect),
            _ => None,
        }
    }

    /// Wire name of this event
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Join => "join",
            EventKind::Leave => "leave",
            EventKind::Play => "play",
            EventKind::Pause => "pause",
            EventKind::Seek => "seek",
            EventKind::Src => "src",
            EventKind::Disconnect => "disconnect",
        }
    }

    /// Whether this event overwrites the cached state of the sender's rooms
    pub fn is_stateful(&self) -> bool {
        matches!(
            self,
            EventKind::Play | EventKind::Pause | EventKind::Seek | EventKind::Src
        )
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips() {
        for kind in [
            EventKind::Join,
            EventKind::Leave,
            EventKind::Play,
            EventKind::Pause,
            EventKind::Seek,
            EventKind::Src,
            EventKind::Disconnect,
        ] {
            assert_eq!(EventKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_from_name_unknown() {
        assert_eq!(EventKind::from_name("shout"), None);
        assert_eq!(EventKind::from_name(""), None);
        assert_eq!(EventKind::from_name("JOIN"), None);
    }

    #[test]
    fn test_stateful_events() {
        assert!(EventKind::Play.is_stateful());
        assert!(EventKind::Pause.is_stateful());
        assert!(EventKind::Seek.is_stateful());
        assert!(EventKind::Src.is_stateful());
        assert!(!EventKind::Join.is_stateful());
        assert!(!EventKind::Leave.is_stateful());
        assert!(!EventKind::Disconnect.is_stateful());
    }
}
