//! Subscription cursors over topic logs.
//!
//! A subscription is a named read position into one topic's log:
//! - Polling returns the next bounded window and advances the cursor
//! - Repositioning moves the cursor to a message id or a published-time cutoff
//!
//! Subscriptions are created on first use and never removed. Cursors are
//! plain offsets; logs only grow, so an offset is never invalidated.
//!
//! # Example
//!
//! ```ignore
//! let tracker = SubscriptionTracker::new(SubscriptionScope::PerTopic);
//! let topic = store.topic("orders")?;
//!
//! // Read in windows of at most 10
//! loop {
//!     let window = tracker.poll(&topic, "billing", 10);
//!     if window.is_empty() {
//!         break;
//!     }
//!     for message in window {
//!         println!("{}", message.id);
//!     }
//! }
//!
//! // Replay from the beginning
//! tracker.set_position(&topic, "billing", &PositionTarget::Start);
//! ```

mod tracker;
mod types;

pub use tracker::SubscriptionTracker;
pub use types::{PositionTarget, SubscriptionInfo};
