use std::path::Path;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::Result;

/// Host-wide overlay defaults. Every field is optional in JSON; durations are
/// in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// How long a closed overlay stays mounted for its exit animation.
    #[serde(rename = "exit_transition_ms", with = "millis")]
    pub exit_transition: Duration,
    #[serde(rename = "message_duration_ms", with = "millis")]
    pub message_duration: Duration,
    pub message_text: String,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            exit_transition: Duration::from_millis(300),
            message_duration: Duration::from_millis(3000),
            message_text: "Message".to_string(),
        }
    }
}

impl OverlaySettings {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Serde adapter for durations stored as whole milliseconds.
pub(crate) mod millis {
    use serde::{Deserialize, Deserializer, Serializer, ser::Error};
    use web_time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(d.as_millis())
            .map_err(|_| S::Error::custom(format!("{d:?} does not fit in u64 milliseconds")))?;
        s.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
