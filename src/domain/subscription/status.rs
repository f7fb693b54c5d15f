//! Subscription lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a persisted subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// A plan is referenced.
    Active,
    /// The plan reference was cleared by cancellation.
    Cancelled,
}

impl SubscriptionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SubscriptionStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn only_active_is_active() {
        assert!(SubscriptionStatus::Active.is_active());
        assert!(!SubscriptionStatus::Cancelled.is_active());
    }
}
