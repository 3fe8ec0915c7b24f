//! HTTP request and response bodies.

use crate::types::{Message, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /topic/{topic}/message`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    pub properties: HashMap<String, String>,
    #[serde(default, deserialize_with = "deserialize_wire_time")]
    pub event_time: Option<Timestamp>,
    pub payload: String,
}

/// Body of `POST /topic/{topic}/poll`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollRequest {
    pub subscription_name: String,
    pub max_number_of_messages: usize,
}

/// Body of `PUT /topic/{topic}/subscription/{subscription}/position`.
///
/// At most one of the two fields may be set; neither rewinds to the start.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPositionRequest {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_wire_time")]
    pub published_time: Option<Timestamp>,
}

/// A timestamp as clients send it: microseconds since the epoch, or an
/// RFC 3339 string.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireTime {
    Micros(i64),
    Rfc3339(String),
}

fn deserialize_wire_time<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<WireTime>::deserialize(deserializer)? {
        None => Ok(None),
        Some(WireTime::Micros(micros)) => Ok(Some(Timestamp(micros))),
        Some(WireTime::Rfc3339(text)) => chrono::DateTime::parse_from_rfc3339(&text)
            .map(|time| Some(Timestamp(time.timestamp_micros())))
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {text:?}: {e}"))),
    }
}

/// A message as returned over HTTP, with the payload as text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub topic: String,
    pub published_time: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
    pub payload: String,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            topic: message.topic.clone(),
            published_time: message.published_time,
            event_time: message.event_time,
            properties: message.properties.clone(),
            payload: String::from_utf8_lossy(&message.payload).into_owned(),
        }
    }
}
