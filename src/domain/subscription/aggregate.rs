//! Subscription aggregate.
//!
//! A subscription belongs to exactly one owner and references at most one
//! plan. Cancelling clears the plan reference; records are never deleted.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OwnerId, PlanId, SubscriptionId, Timestamp, ValidationError};

use super::{SubscriptionParams, SubscriptionStatus};

/// Billing attributes shared by drafts and persisted subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    /// Subscription id at the billing provider.
    pub stripe_id: Option<String>,

    /// Price currently charged, in cents.
    pub current_price: Option<i64>,

    /// Single-use card token from the payment form.
    pub credit_card_token: Option<String>,

    pub card_type: Option<String>,

    pub last_four: Option<String>,
}

impl BillingDetails {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(price) = self.current_price {
            if price < 0 {
                return Err(ValidationError::invalid_format(
                    "current_price",
                    "must not be negative",
                ));
            }
        }
        if let Some(last_four) = &self.last_four {
            if last_four.len() != 4 || !last_four.chars().all(|c| c.is_ascii_digit()) {
                return Err(ValidationError::invalid_format(
                    "last_four",
                    "must be exactly four digits",
                ));
            }
        }
        Ok(())
    }
}

/// An unsaved subscription prepared for an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDraft {
    pub owner_id: OwnerId,
    pub plan_id: Option<PlanId>,
    pub billing: BillingDetails,
}

impl SubscriptionDraft {
    /// Empty draft bound to an owner.
    pub fn for_owner(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            plan_id: None,
            billing: BillingDetails::default(),
        }
    }

    /// Draft with a preselected plan.
    pub fn with_plan(mut self, plan_id: Option<PlanId>) -> Self {
        self.plan_id = plan_id;
        self
    }

    /// Draft built from submitted attributes. The owner always comes from
    /// the resolved request context, never from the parameters.
    pub fn from_params(owner_id: OwnerId, params: SubscriptionParams) -> Self {
        let mut draft = Self::for_owner(owner_id);
        params.apply_to(&mut draft.plan_id, &mut draft.billing);
        draft
    }

    /// Checks record-level constraints before persisting.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.plan_id.is_none() {
            return Err(ValidationError::empty_field("plan_id"));
        }
        self.billing.validate()
    }
}

/// A persisted subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub owner_id: OwnerId,
    pub plan_id: Option<PlanId>,
    pub billing: BillingDetails,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Materializes a draft once the store has assigned an id.
    pub fn from_draft(id: SubscriptionId, draft: SubscriptionDraft, now: Timestamp) -> Self {
        Self {
            id,
            owner_id: draft.owner_id,
            plan_id: draft.plan_id,
            billing: draft.billing,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current lifecycle status, derived from the plan reference.
    pub fn status(&self) -> SubscriptionStatus {
        if self.plan_id.is_some() {
            SubscriptionStatus::Active
        } else {
            SubscriptionStatus::Cancelled
        }
    }

    /// Cancels by clearing the plan reference.
    pub fn cancel(&mut self) {
        self.plan_id = None;
        self.updated_at = Timestamp::now();
    }

    /// Applies submitted attributes (plan change, card update, ...).
    pub fn apply(&mut self, params: SubscriptionParams) -> Result<(), ValidationError> {
        let mut plan_id = self.plan_id;
        let mut billing = self.billing.clone();
        params.apply_to(&mut plan_id, &mut billing);
        billing.validate()?;

        self.plan_id = plan_id;
        self.billing = billing;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
