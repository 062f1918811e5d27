//! Event envelope encoding and decoding
//!
//! The envelope is deliberately loose: `data` is an arbitrary JSON value so
//! that playback payloads pass through the relay untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RelayError, Result};

/// A single wire message: event name plus optional payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name (`join`, `leave`, `play`, `pause`, `seek`, `src`, ...)
    pub event: String,

    /// Event payload, absent for bare events like `disconnect`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    /// Create an envelope with a payload
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data: Some(data),
        }
    }

    /// Create an envelope with no payload
    pub fn bare(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: None,
        }
    }

    /// Decode an envelope from the text of one WebSocket frame
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| RelayError::InvalidFrame(e.to_string()))
    }

    /// Encode this envelope as the text of one WebSocket frame
    ///
    /// Serialization of a string plus a `serde_json::Value` cannot fail, so
    /// this returns the frame directly.
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// The `room` field of the payload, if it is a usable room name
    ///
    /// Room names are non-empty strings; anything else reads as `None`.
    pub fn room(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.get("room"))
            .and_then(Value::as_str)
            .filter(|r| !r.is_empty())
    }
}
