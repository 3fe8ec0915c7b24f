//! Core types for the broker.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Microseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_micros() as i64)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single published message.
///
/// Immutable once stored. Ordering within a topic is given by the message's
/// position in the topic log, not by `published_time`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Globally unique identifier.
    pub id: String,

    /// Topic the message was published to.
    pub topic: String,

    /// When the message was accepted for publishing.
    pub published_time: Timestamp,

    /// Publisher-supplied time of the underlying event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<Timestamp>,

    /// Application-defined string properties.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,

    /// Application-defined payload.
    pub payload: Vec<u8>,
}

impl Message {
    /// Build a message for `topic`, assigning a fresh id and the current time.
    pub fn new(topic: impl Into<String>, input: MessageInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            topic: topic.into(),
            published_time: Timestamp::now(),
            event_time: input.event_time,
            properties: input.properties,
            payload: input.payload,
        }
    }
}

/// Input for publishing a message (before id/published time assigned).
#[derive(Clone, Debug, Default)]
pub struct MessageInput {
    pub payload: Vec<u8>,
    pub properties: HashMap<String, String>,
    pub event_time: Option<Timestamp>,
}

impl MessageInput {
    /// Create a new message input with raw bytes.
    pub fn raw(payload: Vec<u8>) -> Self {
        Self {
            payload,
            ..Default::default()
        }
    }

    /// Create a new message input with a UTF-8 text payload.
    pub fn text(payload: impl Into<String>) -> Self {
        Self::raw(payload.into().into_bytes())
    }

    /// Create a new message input with JSON payload.
    pub fn json(payload: &impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self::raw(serde_json::to_vec(payload)?))
    }

    /// Add a single property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replace all properties.
    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// Set the event time.
    pub fn with_event_time(mut self, event_time: Timestamp) -> Self {
        self.event_time = Some(event_time);
        self
    }
}

/// Summary of a topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicInfo {
    pub id: String,
    pub message_count: usize,
    pub created: Timestamp,
}

/// Broker statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BrokerStats {
    pub topic_count: usize,
    pub message_count: usize,
    pub subscription_count: usize,
}
