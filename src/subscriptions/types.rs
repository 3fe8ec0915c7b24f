//! Subscription types.

use crate::error::{BrokerError, Result};
use crate::types::Timestamp;

/// Where to move a subscription's cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PositionTarget {
    /// Back to the oldest message.
    Start,

    /// Resume at the message with this id. Unknown ids fall back to `Start`.
    MessageId(String),

    /// Resume at the earliest message published at or after this time.
    PublishedTime(Timestamp),
}

impl PositionTarget {
    /// Build a target from the optional id / time pair a caller supplies.
    ///
    /// Neither set means `Start`; both set is rejected.
    pub fn from_parts(message_id: Option<String>, published_time: Option<Timestamp>) -> Result<Self> {
        match (message_id, published_time) {
            (Some(_), Some(_)) => Err(BrokerError::ConflictingPosition),
            (Some(id), None) => Ok(PositionTarget::MessageId(id)),
            (None, Some(time)) => Ok(PositionTarget::PublishedTime(time)),
            (None, None) => Ok(PositionTarget::Start),
        }
    }
}

/// Snapshot of a subscription's state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionInfo {
    pub name: String,
    /// Topic the cursor reads.
    pub topic: String,
    /// Offset of the next message to deliver.
    pub position: usize,
    /// Messages appended but not yet delivered.
    pub pending: usize,
}
