//! Billing customer port.
//!
//! Finds the external billing customer paying for an owner. Two owners
//! resolving to the same customer are treated as belonging to one payer.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::owner::{CustomerRef, Owner};

#[async_trait]
pub trait BillingCustomerResolver: Send + Sync {
    /// Returns `None` when the owner has no billing customer.
    async fn find_customer(&self, owner: &Owner) -> Result<Option<CustomerRef>, DomainError>;
}
