//! # Kitsune
//!
//! A minimal in-memory pub/sub message broker.
//!
//! ## Core Concepts
//!
//! - **Messages**: Immutable published units with a globally unique id
//! - **Topics**: Append-only logs of messages, created on first publish
//! - **Subscriptions**: Named cursors reading a topic at their own pace
//!
//! ## Example
//!
//! ```ignore
//! use kitsune::{Broker, MessageInput, PositionTarget};
//!
//! let broker = Broker::default();
//!
//! // Publish
//! let message = broker.publish("orders", MessageInput::text("created"))?;
//!
//! // Poll up to 10 messages for the "billing" subscription
//! let window = broker.poll_topic("orders", "billing", 10)?;
//!
//! // Replay from a specific message
//! broker.set_subscription_position("orders", "billing", &PositionTarget::MessageId(message.id.clone()))?;
//! ```

pub mod broker;
pub mod config;
pub mod error;
pub mod messages;
pub mod repository;
#[cfg(feature = "server")]
pub mod server;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use broker::Broker;
pub use config::{BrokerConfig, SubscriptionScope};
pub use error::{BrokerError, Result};
pub use messages::{MessageStore, TopicLog};
pub use repository::Repository;
pub use subscriptions::{PositionTarget, SubscriptionInfo, SubscriptionTracker};
pub use types::*;
