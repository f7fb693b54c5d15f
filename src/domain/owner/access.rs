//! Owner access rules.
//!
//! Pure decision logic used by owner resolution. A principal may act on a
//! target owner when it is the principal's own owner record, or when both
//! records are paid for by the same billing customer (one user holding
//! several accounts, for example).
//!
//! # Invariants
//!
//! - Identity is compared by owner id only.
//! - A shared customer grant requires BOTH references to be present; two
//!   owners without customers never share one.

use super::{CustomerRef, Owner};

/// Why access to a target owner was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGrant {
    /// Target is the principal's own owner record.
    SameOwner,
    /// Target is a different owner paid for by the same billing customer.
    SharedCustomer,
}

/// Why access to a target owner was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenial {
    /// No principal, or the principal has no owner record.
    NoPrincipalOwner,
    /// The requested identifier matched no owner.
    OwnerNotFound,
    /// Owners are paid for by different customers.
    CustomerMismatch,
    /// At least one of the owners has no billing customer.
    CustomerMissing,
    /// The requested subscription belongs to neither owner in scope.
    SubscriptionOutOfScope,
}

impl AccessDenial {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDenial::NoPrincipalOwner => "no_principal_owner",
            AccessDenial::OwnerNotFound => "owner_not_found",
            AccessDenial::CustomerMismatch => "customer_mismatch",
            AccessDenial::CustomerMissing => "customer_missing",
            AccessDenial::SubscriptionOutOfScope => "subscription_out_of_scope",
        }
    }
}

/// Returns true when both records denote the same owner.
pub fn is_same_owner(principal_owner: &Owner, target: &Owner) -> bool {
    principal_owner.id == target.id
}

/// Decides cross-owner access from the two billing-customer references.
pub fn shared_customer_access(
    principal_customer: Option<&CustomerRef>,
    target_customer: Option<&CustomerRef>,
) -> Result<AccessGrant, AccessDenial> {
    match (principal_customer, target_customer) {
        (Some(mine), Some(theirs)) if mine == theirs => Ok(AccessGrant::SharedCustomer),
        (Some(_), Some(_)) => Err(AccessDenial::CustomerMismatch),
        _ => Err(AccessDenial::CustomerMissing),
    }
}

/// Outcome of resolving the owner a request acts upon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedOwner {
    /// No owner identifier was supplied; the principal's own owner applies
    /// (absent for anonymous visitors).
    Unscoped(Option<Owner>),

    /// An owner identifier was supplied and access was granted.
    Scoped { owner: Owner, grant: AccessGrant },
}

impl ResolvedOwner {
    /// The owner the request acts upon, if any.
    pub fn owner(&self) -> Option<&Owner> {
        match self {
            ResolvedOwner::Unscoped(owner) => owner.as_ref(),
            ResolvedOwner::Scoped { owner, .. } => Some(owner),
        }
    }

    /// The owner named by the request, `None` for unscoped requests.
    pub fn scoped_owner(&self) -> Option<&Owner> {
        match self {
            ResolvedOwner::Unscoped(_) => None,
            ResolvedOwner::Scoped { owner, .. } => Some(owner),
        }
    }
}
