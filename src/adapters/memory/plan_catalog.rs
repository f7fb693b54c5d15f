//! In-memory plan catalog.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::plan::{Plan, PlanOrdering};
use crate::ports::PlanReader;

/// Fixed set of plans. Plans never change at runtime, so no lock is needed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanCatalog {
    plans: Vec<Plan>,
}

impl InMemoryPlanCatalog {
    /// Builds a catalog, rejecting duplicate ids or billing ids and
    /// negative prices.
    pub fn new(plans: Vec<Plan>) -> Result<Self, DomainError> {
        for (index, plan) in plans.iter().enumerate() {
            if plan.price_cents < 0 {
                return Err(DomainError::validation(
                    "price_cents",
                    format!("Plan {} has a negative price", plan.id),
                ));
            }
            if plan.stripe_id.trim().is_empty() {
                return Err(DomainError::validation(
                    "stripe_id",
                    format!("Plan {} has no billing id", plan.id),
                ));
            }
            let earlier = &plans[..index];
            if earlier.iter().any(|p| p.id == plan.id) {
                return Err(DomainError::validation(
                    "id",
                    format!("Duplicate plan id {}", plan.id),
                ));
            }
            if earlier.iter().any(|p| p.stripe_id == plan.stripe_id) {
                return Err(DomainError::validation(
                    "stripe_id",
                    format!("Duplicate billing id {}", plan.stripe_id),
                ));
            }
        }
        Ok(Self { plans })
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[async_trait]
impl PlanReader for InMemoryPlanCatalog {
    async fn list(&self, ordering: PlanOrdering) -> Result<Vec<Plan>, DomainError> {
        let mut plans = self.plans.clone();
        ordering.sort(&mut plans);
        Ok(plans)
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.plans.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_stripe_id(&self, stripe_id: &str) -> Result<Option<Plan>, DomainError> {
        Ok(self.plans.iter().find(|p| p.stripe_id == stripe_id).cloned())
    }
}
