//! Main Broker struct tying the message store and subscriptions together.

use crate::config::BrokerConfig;
use crate::error::Result;
use crate::messages::MessageStore;
use crate::repository::Repository;
use crate::subscriptions::{PositionTarget, SubscriptionInfo, SubscriptionTracker};
use crate::types::{BrokerStats, Message, MessageInput, TopicInfo};
use std::sync::Arc;

/// The in-memory broker.
///
/// Provides a unified interface for:
/// - Publishing messages to topics
/// - Looking up messages and topics
/// - Polling and repositioning subscriptions
///
/// Publishing only touches the message store. Polling and repositioning read
/// topic logs and only mutate subscription cursors.
pub struct Broker {
    /// Broker configuration.
    config: BrokerConfig,

    /// Topic logs and message index.
    store: MessageStore,

    /// Subscription cursors.
    subscriptions: SubscriptionTracker,
}

impl Broker {
    /// Create an empty broker.
    pub fn new(config: BrokerConfig) -> Self {
        Self {
            subscriptions: SubscriptionTracker::new(config.subscription_scope),
            store: MessageStore::new(),
            config,
        }
    }

    /// Broker configuration.
    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    // --- Message Operations ---

    /// Publish a new message to `topic`, assigning its id and published time.
    pub fn publish(&self, topic: &str, input: MessageInput) -> Result<Arc<Message>> {
        self.store.add_message(Message::new(topic, input))
    }

    /// Store a fully formed message.
    pub fn add_message(&self, message: Message) -> Result<Arc<Message>> {
        self.store.add_message(message)
    }

    /// Get a message by topic and id.
    pub fn get_message(&self, topic: &str, id: &str) -> Result<Arc<Message>> {
        self.store.get_message(topic, id)
    }

    // --- Topic Operations ---

    /// Summaries of all topics, sorted by name.
    pub fn get_topics(&self) -> Vec<TopicInfo> {
        self.store.topics()
    }

    /// Summary of one topic.
    pub fn get_topic(&self, id: &str) -> Result<TopicInfo> {
        Ok(self.store.topic(id)?.info())
    }

    // --- Subscription Operations ---

    /// Return the next window of at most `max_count` messages for a subscription.
    pub fn poll_topic(
        &self,
        topic: &str,
        subscription: &str,
        max_count: usize,
    ) -> Result<Vec<Arc<Message>>> {
        let log = self.store.topic(topic)?;
        Ok(self.subscriptions.poll(&log, subscription, max_count))
    }

    /// Move a subscription's cursor. Returns the new offset.
    ///
    /// An unknown topic fails without creating the subscription.
    pub fn set_subscription_position(
        &self,
        topic: &str,
        subscription: &str,
        target: &PositionTarget,
    ) -> Result<usize> {
        let log = self.store.topic(topic)?;
        Ok(self.subscriptions.set_position(&log, subscription, target))
    }

    /// Inspect a subscription without creating it.
    pub fn subscription(&self, topic: &str, subscription: &str) -> Option<SubscriptionInfo> {
        self.subscriptions.subscription(topic, subscription)
    }

    // --- Statistics ---

    /// Get broker statistics.
    pub fn stats(&self) -> BrokerStats {
        BrokerStats {
            topic_count: self.store.topic_count(),
            message_count: self.store.message_count(),
            subscription_count: self.subscriptions.subscription_count(),
        }
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new(BrokerConfig::default())
    }
}

impl Repository for Broker {
    fn add_message(&self, message: Message) -> Result<()> {
        Broker::add_message(self, message).map(|_| ())
    }

    fn get_message(&self, topic: &str, id: &str) -> Result<Arc<Message>> {
        Broker::get_message(self, topic, id)
    }

    fn poll_topic(
        &self,
        topic: &str,
        subscription: &str,
        max_count: usize,
    ) -> Result<Vec<Arc<Message>>> {
        Broker::poll_topic(self, topic, subscription, max_count)
    }

    fn set_subscription_position(
        &self,
        topic: &str,
        subscription: &str,
        target: PositionTarget,
    ) -> Result<()> {
        Broker::set_subscription_position(self, topic, subscription, &target).map(|_| ())
    }

    fn get_topics(&self) -> Vec<TopicInfo> {
        Broker::get_topics(self)
    }

    fn get_topic(&self, id: &str) -> Result<TopicInfo> {
        Broker::get_topic(self, id)
    }
}
