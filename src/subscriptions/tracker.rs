//! Subscription tracker: named cursors and their poll/reposition logic.

use crate::config::SubscriptionScope;
use crate::messages::TopicLog;
use crate::types::Message;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use super::types::{PositionTarget, SubscriptionInfo};

/// Lookup key for a subscription. `topic` is `None` under global scoping.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SubscriptionKey {
    topic: Option<String>,
    name: String,
}

/// Internal subscription state.
struct Subscription {
    name: String,
    /// Log this cursor reads. Fixed at creation.
    topic: Arc<TopicLog>,
    /// Offset of the next message to deliver. Always `<= topic.len()`.
    cursor: Mutex<usize>,
}

impl Subscription {
    fn info(&self) -> SubscriptionInfo {
        let position = *self.cursor.lock();
        SubscriptionInfo {
            name: self.name.clone(),
            topic: self.topic.id().to_string(),
            position,
            pending: self.topic.len().saturating_sub(position),
        }
    }
}

/// Owns all subscription cursors.
///
/// Each cursor has its own lock. A poll or reposition holds that lock for the
/// whole read-compute-advance step and only a shared lock on the topic log,
/// so concurrent polls on one subscription never see the same starting
/// offset, and pollers never block each other on the log.
pub struct SubscriptionTracker {
    scope: SubscriptionScope,
    /// Subscriptions by key.
    subscriptions: RwLock<HashMap<SubscriptionKey, Arc<Subscription>>>,
}

impl SubscriptionTracker {
    /// Create an empty tracker.
    pub fn new(scope: SubscriptionScope) -> Self {
        Self {
            scope,
            subscriptions: RwLock::new(HashMap::new()),
        }
    }

    /// Scoping in effect.
    pub fn scope(&self) -> SubscriptionScope {
        self.scope
    }

    /// Return up to `max_count` undelivered messages and advance the cursor past them.
    ///
    /// Creates the subscription at offset 0 if it does not exist yet. Once the
    /// log is drained the result is empty until more messages are appended.
    pub fn poll(&self, topic: &Arc<TopicLog>, name: &str, max_count: usize) -> Vec<Arc<Message>> {
        let subscription = self.get_or_create(topic, name);

        let mut cursor = subscription.cursor.lock();
        let log = subscription.topic.read();

        let start = *cursor;
        let end = start.saturating_add(max_count).min(log.len());
        let window = log[start..end].to_vec();
        drop(log);

        *cursor = end;
        window
    }

    /// Move the cursor so delivery resumes at `target`. Returns the new offset.
    ///
    /// Creates the subscription if it does not exist yet.
    pub fn set_position(&self, topic: &Arc<TopicLog>, name: &str, target: &PositionTarget) -> usize {
        let subscription = self.get_or_create(topic, name);

        let mut cursor = subscription.cursor.lock();
        let log = subscription.topic.read();

        let position = find_position(&log, target);
        drop(log);

        *cursor = position;
        position
    }

    /// Inspect a subscription without creating it.
    pub fn subscription(&self, topic: &str, name: &str) -> Option<SubscriptionInfo> {
        let key = self.key(topic, name);
        let subscription = self.subscriptions.read().get(&key).cloned()?;
        Some(subscription.info())
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    fn key(&self, topic: &str, name: &str) -> SubscriptionKey {
        let topic = match self.scope {
            SubscriptionScope::PerTopic => Some(topic.to_string()),
            SubscriptionScope::Global => None,
        };
        SubscriptionKey {
            topic,
            name: name.to_string(),
        }
    }

    /// Get a subscription, creating it bound to `topic` at offset 0 if absent.
    ///
    /// Concurrent callers racing on the same key all receive the same instance.
    fn get_or_create(&self, topic: &Arc<TopicLog>, name: &str) -> Arc<Subscription> {
        let key = self.key(topic.id(), name);

        if let Some(subscription) = self.subscriptions.read().get(&key) {
            return Arc::clone(subscription);
        }

        let mut subs = self.subscriptions.write();
        let subscription = subs.entry(key).or_insert_with(|| {
            tracing::debug!(topic = topic.id(), subscription = name, "creating subscription");
            Arc::new(Subscription {
                name: name.to_string(),
                topic: Arc::clone(topic),
                cursor: Mutex::new(0),
            })
        });
        Arc::clone(subscription)
    }
}

/// Scan the log from newest to oldest for the offset to resume at.
///
/// A message id matches exactly. A published-time cutoff matches the first
/// position (scanning backwards) whose predecessor was published strictly
/// before the cutoff; position 0 has no predecessor and always matches.
/// With no match the result is 0.
fn find_position(log: &[Arc<Message>], target: &PositionTarget) -> usize {
    for p in (0..log.len()).rev() {
        match target {
            PositionTarget::MessageId(id) if log[p].id == *id => return p,
            PositionTarget::PublishedTime(cutoff) => {
                if p == 0 || log[p - 1].published_time < *cutoff {
                    return p;
                }
            }
            _ => {}
        }
    }
    0
}
