//! ResolveOwnerHandler - decides which owner a request acts upon.
//!
//! Runs before every subscription action. A request either names no owner
//! (the principal's own record applies) or names one by id or slug, in
//! which case the principal must be that owner or share its billing
//! customer. Failures halt the request with `Unauthorized`.
//!
//! Resolution only reads; calling it twice yields the same outcome.

use std::sync::Arc;

use crate::domain::foundation::{OwnerId, Principal};
use crate::domain::owner::{
    is_same_owner, shared_customer_access, AccessDenial, AccessGrant, CustomerRef, Owner,
    ResolvedOwner,
};
use crate::domain::subscription::SubscriptionError;
use crate::ports::{BillingCustomerResolver, CurrentOwnerAccessor, OwnerDirectory};

/// Query to resolve the owner for a request.
#[derive(Debug, Clone)]
pub struct ResolveOwnerQuery {
    /// Owner identifier from the path, if the route is owner-scoped.
    pub owner_param: Option<String>,
    pub principal: Option<Principal>,
}

/// Owners in play for the rest of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerContext {
    /// The principal's own owner record.
    pub current_owner: Option<Owner>,
    pub resolved: ResolvedOwner,
}

impl OwnerContext {
    /// Context for requests that named no owner.
    pub fn unscoped(current_owner: Option<Owner>) -> Self {
        Self {
            resolved: ResolvedOwner::Unscoped(current_owner.clone()),
            current_owner,
        }
    }

    /// The owner the request acts upon.
    pub fn owner(&self) -> Option<&Owner> {
        self.resolved.owner()
    }

    /// The owner named in the request path.
    pub fn scoped_owner(&self) -> Option<&Owner> {
        self.resolved.scoped_owner()
    }
}

pub struct ResolveOwnerHandler {
    directory: Arc<dyn OwnerDirectory>,
    current_owner: Arc<dyn CurrentOwnerAccessor>,
    customers: Arc<dyn BillingCustomerResolver>,
}

impl ResolveOwnerHandler {
    pub fn new(
        directory: Arc<dyn OwnerDirectory>,
        current_owner: Arc<dyn CurrentOwnerAccessor>,
        customers: Arc<dyn BillingCustomerResolver>,
    ) -> Self {
        Self {
            directory,
            current_owner,
            customers,
        }
    }

    pub async fn handle(&self, query: ResolveOwnerQuery) -> Result<OwnerContext, SubscriptionError> {
        let current_owner = match &query.principal {
            Some(principal) => self.current_owner.current_owner(principal).await?,
            None => None,
        };

        let Some(identifier) = query.owner_param.as_deref() else {
            return Ok(OwnerContext::unscoped(current_owner));
        };

        let Some(principal_owner) = current_owner else {
            tracing::warn!(owner = identifier, "Owner-scoped request without a principal owner");
            return Err(SubscriptionError::unauthorized(AccessDenial::NoPrincipalOwner));
        };

        let Some(target) = self.lookup(identifier).await else {
            tracing::warn!(owner = identifier, "Requested owner not found");
            return Err(SubscriptionError::unauthorized(AccessDenial::OwnerNotFound));
        };

        if is_same_owner(&principal_owner, &target) {
            return Ok(OwnerContext {
                resolved: ResolvedOwner::Scoped {
                    owner: principal_owner.clone(),
                    grant: AccessGrant::SameOwner,
                },
                current_owner: Some(principal_owner),
            });
        }

        let target_customer = self.customer_of(&target).await;
        let principal_customer = self.customer_of(&principal_owner).await;

        match shared_customer_access(principal_customer.as_ref(), target_customer.as_ref()) {
            Ok(grant) => {
                tracing::debug!(
                    principal_owner = %principal_owner.id,
                    owner = %target.id,
                    "Granted access through shared billing customer"
                );
                Ok(OwnerContext {
                    resolved: ResolvedOwner::Scoped {
                        owner: target,
                        grant,
                    },
                    current_owner: Some(principal_owner),
                })
            }
            Err(denial) => {
                tracing::warn!(
                    principal_owner = %principal_owner.id,
                    owner = %target.id,
                    reason = denial.as_str(),
                    "Denied access to owner"
                );
                Err(SubscriptionError::unauthorized(denial))
            }
        }
    }

    /// Primary id first, then slug when the directory supports it. Lookup
    /// errors count as "not found".
    async fn lookup(&self, identifier: &str) -> Option<Owner> {
        if let Ok(id) = identifier.parse::<OwnerId>() {
            match self.directory.find_by_id(id).await {
                Ok(Some(owner)) => return Some(owner),
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(owner = identifier, error = %err, "Owner id lookup failed");
                }
            }
        }

        if !self.directory.capabilities().slug_lookup {
            return None;
        }

        match self.directory.find_by_slug(identifier).await {
            Ok(found) => found,
            Err(err) => {
                tracing::debug!(owner = identifier, error = %err, "Owner slug lookup failed");
                None
            }
        }
    }

    async fn customer_of(&self, owner: &Owner) -> Option<CustomerRef> {
        match self.customers.find_customer(owner).await {
            Ok(customer) => customer,
            Err(err) => {
                tracing::warn!(owner = %owner.id, error = %err, "Billing customer lookup failed");
                None
            }
        }
    }
}
