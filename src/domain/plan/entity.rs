//! Pricing plan entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PlanId;

/// A pricing tier offered to owners.
///
/// Plans are read-only from this service's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,

    pub name: String,

    /// Price per billing interval, in cents.
    pub price_cents: i64,

    /// Position on the pricing page (ascending).
    #[serde(default)]
    pub display_order: i32,

    /// Identifier of the plan at the billing provider.
    pub stripe_id: String,
}

impl Plan {
    /// A plan is free when it costs nothing.
    pub fn is_free(&self) -> bool {
        self.price_cents == 0
    }

    /// True when moving from `self` to `target` turns a free plan into a
    /// paid one, which requires payment details.
    pub fn requires_payment_to_switch_to(&self, target: &Plan) -> bool {
        self.is_free() && !target.is_free()
    }
}

/// Sort order for plan listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanOrdering {
    /// Cheapest first (edit page).
    #[default]
    Price,
    /// Pricing-page order (index page).
    DisplayOrder,
}

impl PlanOrdering {
    /// Sorts plans in place; ties fall back to id for a stable listing.
    pub fn sort(&self, plans: &mut [Plan]) {
        match self {
            PlanOrdering::Price => plans.sort_by_key(|p| (p.price_cents, p.id)),
            PlanOrdering::DisplayOrder => plans.sort_by_key(|p| (p.display_order, p.id)),
        }
    }

    /// SQL ORDER BY clause for this ordering.
    pub fn order_by(&self) -> &'static str {
        match self {
            PlanOrdering::Price => "price_cents ASC, id ASC",
            PlanOrdering::DisplayOrder => "display_order ASC, id ASC",
        }
    }
}
