//! The repository contract front ends program against.

use crate::error::Result;
use crate::subscriptions::PositionTarget;
use crate::types::{Message, TopicInfo};
use std::sync::Arc;

/// Operations a broker exposes to its callers.
///
/// Implementations must be safe to call from any number of threads at once.
/// Errors are always one of the [`BrokerError`](crate::BrokerError) variants
/// and are never logged or retried by the implementation.
pub trait Repository: Send + Sync {
    /// Store a message. Fails with `DuplicateMessage` if the id is taken.
    fn add_message(&self, message: Message) -> Result<()>;

    /// Fetch a message by topic and id.
    fn get_message(&self, topic: &str, id: &str) -> Result<Arc<Message>>;

    /// Deliver the next window of at most `max_count` messages to a subscription.
    fn poll_topic(&self, topic: &str, subscription: &str, max_count: usize)
        -> Result<Vec<Arc<Message>>>;

    /// Move a subscription's cursor.
    fn set_subscription_position(
        &self,
        topic: &str,
        subscription: &str,
        target: PositionTarget,
    ) -> Result<()>;

    /// Summaries of all topics.
    fn get_topics(&self) -> Vec<TopicInfo>;

    /// Summary of one topic.
    fn get_topic(&self, id: &str) -> Result<TopicInfo>;
}
