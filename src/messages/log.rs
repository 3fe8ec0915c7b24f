//! Append-only topic log.

use crate::types::{Message, Timestamp, TopicInfo};
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Append-only, in-memory log of the messages published to one topic.
///
/// Readers take a shared lock, appenders an exclusive one. Entries are
/// reference counted so a returned window stays valid while the log grows.
pub struct TopicLog {
    /// Topic name.
    id: String,

    /// When the topic was first published to.
    created: Timestamp,

    /// Messages in append order.
    messages: RwLock<Vec<Arc<Message>>>,
}

impl TopicLog {
    /// Create an empty log.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: Timestamp::now(),
            messages: RwLock::new(Vec::new()),
        }
    }

    /// Topic name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation time.
    pub fn created(&self) -> Timestamp {
        self.created
    }

    /// Number of messages in the log.
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    /// Append a message. Returns the position it was written at.
    pub(crate) fn append(&self, message: Arc<Message>) -> usize {
        let mut messages = self.messages.write();
        messages.push(message);
        messages.len() - 1
    }

    /// Hold a shared lock on the log for a multi-step read.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<Message>>> {
        self.messages.read()
    }

    /// Summary of this topic.
    pub fn info(&self) -> TopicInfo {
        TopicInfo {
            id: self.id.clone(),
            message_count: self.len(),
            created: self.created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageInput;

    fn message(topic: &str, payload: &str) -> Arc<Message> {
        Arc::new(Message::new(topic, MessageInput::text(payload)))
    }

    #[test]
    fn test_append_assigns_positions() {
        let log = TopicLog::new("orders");
        assert!(log.is_empty());

        assert_eq!(log.append(message("orders", "a")), 0);
        assert_eq!(log.append(message("orders", "b")), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.read()[1].payload, b"b");
        assert!(log.read().get(2).is_none());
    }

    #[test]
    fn test_read_copy_is_a_snapshot() {
        let log = TopicLog::new("orders");
        log.append(message("orders", "a"));
        log.append(message("orders", "b"));

        let window = log.read().to_vec();
        log.append(message("orders", "c"));

        assert_eq!(window.len(), 2);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_info() {
        let log = TopicLog::new("orders");
        log.append(message("orders", "a"));

        let info = log.info();
        assert_eq!(info.id, "orders");
        assert_eq!(info.message_count, 1);
        assert_eq!(info.created, log.created());
    }
}
