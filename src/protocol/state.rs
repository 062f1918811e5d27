//! Typed view of a room's playback state
//!
//! The registry caches playback payloads as raw JSON so the relay stays
//! agnostic to client extensions. `RoomState` is the typed view used where
//! the fields actually matter: demo clients, logging, and tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Last-known playback state of a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomState {
    /// URL of the video currently loaded
    pub video_src: String,

    /// Playhead position in seconds
    #[serde(default)]
    pub progress: f64,

    /// Whether playback is running
    #[serde(default)]
    pub playing: bool,
}

impl RoomState {
    /// Interpret a cached payload as playback state
    ///
    /// Returns `None` when the payload does not carry the expected fields,
    /// e.g. when a client cached something the relay passed through blindly.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Convert back into the wire payload shape
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {:.1}s ({})",
            self.video_src,
            self.progress,
            if self.playing { "playing" } else { "paused" }
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_value_camel_case() {
        let value = json!({"videoSrc": "reef.mp4", "progress": 42.5, "playing": true});
        let state = RoomState::from_value(&value).unwrap();

        assert_eq!(state.video_src, "reef.mp4");
        assert_eq!(state.progress, 42.5);
        assert!(state.playing);
    }

    #[test]
    fn test_from_value_defaults_optional_fields() {
        // A bare source change carries only the video URL
        let value = json!({"videoSrc": "reef.mp4"});
        let state = RoomState::from_value(&value).unwrap();

        assert_eq!(state.progress, 0.0);
        assert!(!state.playing);
    }

    #[test]
    fn test_from_value_rejects_foreign_payloads() {
        assert!(RoomState::from_value(&json!({"volume": 0.3})).is_none());
        assert!(RoomState::from_value(&Value::Null).is_none());
    }

    #[test]
    fn test_to_value_uses_wire_names() {
        let state = RoomState {
            video_src: "reef.mp4".to_string(),
            progress: 1.0,
            playing: false,
        };

        let value = state.to_value();
        assert_eq!(value["videoSrc"], "reef.mp4");
        assert!(value.get("video_src").is_none());
    }
}
