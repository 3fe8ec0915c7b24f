//! Message store: topic logs plus the global message index.

use crate::error::{BrokerError, Result};
use crate::types::{Message, TopicInfo};
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use super::log::TopicLog;

/// Owns every topic log and the id index shared by all topics.
///
/// The index and the topic map are guarded separately so appends to
/// unrelated topics only contend on the short duplicate check.
pub struct MessageStore {
    /// Topic logs by name.
    topics: RwLock<HashMap<String, Arc<TopicLog>>>,

    /// Message id to message, across all topics.
    messages: RwLock<HashMap<String, Arc<Message>>>,
}

impl MessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            messages: RwLock::new(HashMap::new()),
        }
    }

    /// Store a message and append it to its topic, creating the topic if needed.
    ///
    /// The id is claimed in the index before anything else is touched, so a
    /// rejected duplicate leaves both the index and every topic unchanged.
    ///
    /// The two steps are not atomic together. For a brief window after the id
    /// is claimed, `get_message` already finds the message while `poll` and
    /// the topic's message count do not; a concurrent first publish to a new
    /// topic may likewise see `TopicNotFound` from `get_message`.
    pub fn add_message(&self, message: Message) -> Result<Arc<Message>> {
        let message = Arc::new(message);

        match self.messages.write().entry(message.id.clone()) {
            Entry::Occupied(_) => return Err(BrokerError::DuplicateMessage(message.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&message));
            }
        }

        let topic = self.get_or_create_topic(&message.topic);
        topic.append(Arc::clone(&message));

        Ok(message)
    }

    /// Look up a message filed under `topic`.
    ///
    /// Topic existence is checked first. An id that exists under a different
    /// topic is reported as not found for this one.
    pub fn get_message(&self, topic: &str, id: &str) -> Result<Arc<Message>> {
        if !self.topics.read().contains_key(topic) {
            return Err(BrokerError::TopicNotFound(topic.to_string()));
        }

        self.messages
            .read()
            .get(id)
            .filter(|message| message.topic == topic)
            .cloned()
            .ok_or_else(|| BrokerError::MessageNotFound {
                topic: topic.to_string(),
                id: id.to_string(),
            })
    }

    /// Get a topic log.
    pub fn topic(&self, id: &str) -> Result<Arc<TopicLog>> {
        self.topics
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| BrokerError::TopicNotFound(id.to_string()))
    }

    /// Get a topic log, creating it if absent.
    ///
    /// Concurrent callers racing on the same name all receive the same log.
    pub fn get_or_create_topic(&self, id: &str) -> Arc<TopicLog> {
        if let Some(topic) = self.topics.read().get(id) {
            return Arc::clone(topic);
        }

        let mut topics = self.topics.write();
        let topic = topics.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(topic = id, "creating topic");
            Arc::new(TopicLog::new(id))
        });
        Arc::clone(topic)
    }

    /// Summaries of all topics, sorted by name.
    pub fn topics(&self) -> Vec<TopicInfo> {
        let mut infos: Vec<TopicInfo> = self
            .topics
            .read()
            .values()
            .map(|topic| topic.info())
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    /// Number of topics.
    pub fn topic_count(&self) -> usize {
        self.topics.read().len()
    }

    /// Number of stored messages.
    pub fn message_count(&self) -> usize {
        self.messages.read().len()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageInput, Timestamp};

    fn make_message(id: &str, topic: &str, payload: &str) -> Message {
        Message {
            id: id.to_string(),
            topic: topic.to_string(),
            published_time: Timestamp::now(),
            event_time: None,
            properties: HashMap::new(),
            payload: payload.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_add_message() {
        let store = MessageStore::new();

        store.add_message(make_message("message1", "topic", "payload1")).unwrap();
        store.add_message(make_message("message2", "topic", "payload2")).unwrap();
        store.add_message(make_message("message3", "other", "payload3")).unwrap();

        assert_eq!(store.message_count(), 3);
        assert_eq!(store.topic_count(), 2);
        assert_eq!(store.topic("topic").unwrap().len(), 2);
    }

    #[test]
    fn test_add_message_duplicate_id() {
        let store = MessageStore::new();
        store.add_message(make_message("message1", "topic", "first")).unwrap();

        let result = store.add_message(make_message("message1", "topic", "second"));
        assert_eq!(result.unwrap_err(), BrokerError::DuplicateMessage("message1".into()));

        assert_eq!(store.message_count(), 1);
        assert_eq!(store.topic("topic").unwrap().len(), 1);
        assert_eq!(store.get_message("topic", "message1").unwrap().payload, b"first");
    }

    #[test]
    fn test_duplicate_id_does_not_create_topic() {
        let store = MessageStore::new();
        store.add_message(make_message("message1", "topic", "first")).unwrap();

        let result = store.add_message(make_message("message1", "elsewhere", "second"));
        assert!(matches!(result, Err(BrokerError::DuplicateMessage(_))));
        assert!(matches!(store.topic("elsewhere"), Err(BrokerError::TopicNotFound(_))));
    }

    #[test]
    fn test_get_message() {
        let store = MessageStore::new();
        store.add_message(make_message("message1", "topic", "payload1")).unwrap();
        store.add_message(make_message("message2", "topic", "payload2")).unwrap();

        let message = store.get_message("topic", "message2").unwrap();
        assert_eq!(message.id, "message2");
        assert_eq!(message.payload, b"payload2");
    }

    #[test]
    fn test_get_message_checks_topic_first() {
        let store = MessageStore::new();
        store.add_message(make_message("message1", "topic", "payload1")).unwrap();

        assert_eq!(
            store.get_message("missing", "message1").unwrap_err(),
            BrokerError::TopicNotFound("missing".into())
        );
    }

    #[test]
    fn test_get_message_wrong_topic() {
        let store = MessageStore::new();
        store.add_message(make_message("message1", "a", "payload1")).unwrap();
        store.add_message(make_message("message2", "b", "payload2")).unwrap();

        assert!(matches!(
            store.get_message("b", "message1"),
            Err(BrokerError::MessageNotFound { .. })
        ));
    }

    #[test]
    fn test_topics_sorted() {
        let store = MessageStore::new();
        assert!(store.topics().is_empty());

        for name in ["topic3", "topic1", "topic2"] {
            store.add_message(Message::new(name, MessageInput::text("x"))).unwrap();
        }

        let names: Vec<String> = store.topics().into_iter().map(|t| t.id).collect();
        assert_eq!(names, vec!["topic1", "topic2", "topic3"]);
    }

    #[test]
    fn test_get_or_create_topic_returns_same_log() {
        let store = MessageStore::new();
        let a = store.get_or_create_topic("topic");
        let b = store.get_or_create_topic("topic");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.topic_count(), 1);
    }
}
