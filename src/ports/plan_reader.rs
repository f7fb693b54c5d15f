//! Plan reader port (read side).
//!
//! Plans are managed elsewhere; this service only lists and looks them up.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::plan::{Plan, PlanOrdering};

#[async_trait]
pub trait PlanReader: Send + Sync {
    /// All plans in the requested order.
    async fn list(&self, ordering: PlanOrdering) -> Result<Vec<Plan>, DomainError>;

    /// Find a plan by primary identifier.
    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError>;

    /// Find a plan by its billing-provider identifier.
    async fn find_by_stripe_id(&self, stripe_id: &str) -> Result<Option<Plan>, DomainError>;
}
