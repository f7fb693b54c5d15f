//! Billing customer read from the owner record.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::owner::{CustomerRef, Owner};
use crate::ports::BillingCustomerResolver;

/// Uses the customer reference persisted alongside the owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerRecordCustomerResolver;

#[async_trait]
impl BillingCustomerResolver for OwnerRecordCustomerResolver {
    async fn find_customer(&self, owner: &Owner) -> Result<Option<CustomerRef>, DomainError> {
        Ok(owner.billing_customer.clone())
    }
}
