//! Event access (read side plus the soft-fail annotation).
//!
//! The policy engine never depends on a concrete event type. Hosts hand events
//! over either as typed structs ([`MessageEvent`]) or as raw JSON mappings
//! (`serde_json::Value`); both implement [`EventFields`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Narrow accessor capability consumed by the policy engine.
pub trait EventFields {
    /// Sender identifier (`localpart:domain`). Empty when the event has none.
    fn sender(&self) -> &str;

    /// `content.body`, if present and a string.
    fn body(&self) -> Option<&str>;

    /// Event id, used for log correlation only.
    fn event_id(&self) -> Option<&str> {
        None
    }

    /// Mark the event as soft-failed (kept locally, not distributed).
    fn mark_soft_failed(&mut self);
}

/// Message content. Only `body` is read by the rules; the rest is carried through.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EventContent {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Host-owned metadata that is not part of the federated event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InternalMetadata {
    #[serde(default)]
    pub soft_failed: bool,
}

/// Attribute-style event representation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub content: EventContent,
    #[serde(default)]
    pub internal_metadata: InternalMetadata,
}

impl MessageEvent {
    pub fn new(sender: impl Into<String>, body: Option<&str>) -> Self {
        Self {
            sender: sender.into(),
            content: EventContent {
                body: body.map(str::to_string),
                ..EventContent::default()
            },
            ..Self::default()
        }
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    pub fn is_soft_failed(&self) -> bool {
        self.internal_metadata.soft_failed
    }
}

impl EventFields for MessageEvent {
    fn sender(&self) -> &str {
        &self.sender
    }

    fn body(&self) -> Option<&str> {
        self.content.body.as_deref()
    }

    fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    fn mark_soft_failed(&mut self) {
        self.internal_metadata.soft_failed = true;
    }
}

/// Mapping-style events: `{"sender": .., "content": {"body": ..}, ...}`.
///
/// A non-string `body` counts as absent. Soft-fail is recorded as
/// `internal_metadata.soft_failed = true`; non-object values are left untouched.
impl EventFields for Value {
    fn sender(&self) -> &str {
        self.get("sender").and_then(Value::as_str).unwrap_or("")
    }

    fn body(&self) -> Option<&str> {
        self.get("content")
            .and_then(|c| c.get("body"))
            .and_then(Value::as_str)
    }

    fn event_id(&self) -> Option<&str> {
        self.get("event_id").and_then(Value::as_str)
    }

    fn mark_soft_failed(&mut self) {
        let Some(obj) = self.as_object_mut() else {
            return;
        };
        let meta = obj
            .entry("internal_metadata")
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if !meta.is_object() {
            *meta = Value::Object(serde_json::Map::new());
        }
        if let Some(meta) = meta.as_object_mut() {
            meta.insert("soft_failed".to_string(), Value::Bool(true));
        }
    }
}

/// Room invite as seen by the host. Only `inviter` is consulted by rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Invite {
    pub inviter: String,
    pub invitee: String,
    pub room_id: String,
}

/// Read the soft-fail annotation back from a mapping-style event.
pub fn json_is_soft_failed(event: &Value) -> bool {
    event
        .get("internal_metadata")
        .and_then(|m| m.get("soft_failed"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
