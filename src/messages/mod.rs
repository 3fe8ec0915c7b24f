//! Message storage.
//!
//! Each topic owns an append-only log of messages; positions in a log never
//! change once assigned. A global index maps message ids to messages and
//! rejects duplicates across all topics.

mod log;
mod store;

pub use log::TopicLog;
pub use store::MessageStore;
