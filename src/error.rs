//! Error types for the broker.

use thiserror::Error;

/// Main error type for broker operations.
///
/// The set is closed: every failure the core can report is one of these
/// variants, and each is deterministic given the current broker state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    #[error("Duplicate message id: {0}")]
    DuplicateMessage(String),

    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    #[error("Message not found: {id} (topic {topic})")]
    MessageNotFound { topic: String, id: String },

    #[error("Cannot specify both a message id and a published time when setting a subscription position")]
    ConflictingPosition,
}

/// Result type for broker operations.
pub type Result<T> = std::result::Result<T, BrokerError>;
