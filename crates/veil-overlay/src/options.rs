//! Overlay requests: what callers pass in, and what components receive.
//!
//! Typed builders are the normal path. `from_value` accepts a loose JSON
//! property bag and falls back to defaults for anything malformed, logging a
//! warning instead of failing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use web_time::Duration;

use crate::settings::OverlaySettings;

/// Severity tag of a message; drives its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Success,
        Severity::Warning,
        Severity::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeverity(pub String);

impl fmt::Display for UnknownSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown message type `{}`", self.0)
    }
}

impl std::error::Error for UnknownSeverity {}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

/// Request for a toast message. Unset fields take the defaults from
/// [`OverlaySettings`] (`"Message"`, `info`, 3000 ms).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOptions {
    pub message: Option<String>,
    pub severity: Option<Severity>,
    pub duration: Option<Duration>,
}

impl MessageOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Auto-dismiss delay. Zero keeps the message until it is closed.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Reads `message`, `type` and `duration` (milliseconds) from a JSON
    /// object. Missing or malformed fields stay unset.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = object_or_warn(value, "message") else {
            return Self::default();
        };
        Self {
            message: string_field(map, "message"),
            severity: match map.get("type") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => match s.parse() {
                    Ok(sev) => Some(sev),
                    Err(e) => {
                        log::warn!("message options: {e}; using default");
                        None
                    }
                },
                Some(other) => {
                    log::warn!("message options: `type` must be a string, got {other}");
                    None
                }
            },
            duration: millis_field(map, "duration"),
        }
    }

    pub fn resolve(&self, settings: &OverlaySettings) -> MessageProps {
        MessageProps {
            message: self
                .message
                .clone()
                .unwrap_or_else(|| settings.message_text.clone()),
            severity: self.severity.unwrap_or_default(),
            duration: self.duration.unwrap_or(settings.message_duration),
        }
    }
}

/// Fully resolved message configuration handed to the component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageProps {
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
    #[serde(with = "crate::settings::millis")]
    pub duration: Duration,
}

/// Request for a confirmation dialog. Keys the component does not know about
/// are kept in `extra` and forwarded as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogOptions {
    pub message: Option<String>,
    pub title: Option<String>,
    pub confirm_text: Option<String>,
    pub cancel_text: Option<String>,
    pub extra: Map<String, Value>,
}

impl DialogOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn from_value(value: &Value) -> Self {
        let Some(map) = object_or_warn(value, "dialog") else {
            return Self::default();
        };
        const KNOWN: [&str; 4] = ["message", "title", "confirmText", "cancelText"];
        Self {
            message: string_field(map, "message"),
            title: string_field(map, "title"),
            confirm_text: string_field(map, "confirmText"),
            cancel_text: string_field(map, "cancelText"),
            extra: map
                .iter()
                .filter(|(k, _)| !KNOWN.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

fn object_or_warn<'a>(value: &'a Value, what: &str) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        Value::Null => None,
        other => {
            log::warn!("{what} options must be an object, got {other}; using defaults");
            None
        }
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            log::warn!("overlay options: `{key}` must be a string, got {other}; using default");
            None
        }
    }
}

fn millis_field(map: &Map<String, Value>, key: &str) -> Option<Duration> {
    let value = map.get(key)?;
    if value.is_null() {
        return None;
    }
    if let Some(ms) = value.as_u64() {
        return Some(Duration::from_millis(ms));
    }
    let duration = value
        .as_f64()
        .filter(|ms| !ms.is_sign_negative())
        .and_then(|ms| Duration::try_from_secs_f64(ms / 1000.0).ok());
    if duration.is_none() {
        log::warn!("overlay options: `{key}` must be a non-negative number of milliseconds, got {value}; using default");
    }
    duration
}
