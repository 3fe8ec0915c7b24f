//! Broker configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How subscription names are scoped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubscriptionScope {
    /// Subscriptions are keyed by `(topic, name)`; the same name on two
    /// topics gives two independent cursors.
    #[default]
    PerTopic,

    /// Subscriptions are keyed by name alone. A name stays bound to the
    /// first topic it was used with, whatever topic later calls pass.
    Global,
}

impl fmt::Display for SubscriptionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionScope::PerTopic => write!(f, "per-topic"),
            SubscriptionScope::Global => write!(f, "global"),
        }
    }
}

impl FromStr for SubscriptionScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "per-topic" | "per_topic" | "pertopic" => Ok(SubscriptionScope::PerTopic),
            "global" => Ok(SubscriptionScope::Global),
            other => Err(format!(
                "unknown subscription scope {other:?} (expected \"per-topic\" or \"global\")"
            )),
        }
    }
}

/// Broker configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Scoping of subscription names.
    /// Default: per-topic
    pub subscription_scope: SubscriptionScope,
}
