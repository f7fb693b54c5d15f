//! Owner entity and billing-customer reference.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{OwnerId, PrincipalId, ValidationError};

use super::OwnerKind;

/// Reference to the external billing customer that pays for an owner.
///
/// Several owners may share one customer (a user paying for multiple
/// accounts).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerRef(String);

impl CustomerRef {
    /// Creates a customer reference, rejecting blanks.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("billing_customer"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entity that may hold a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,

    pub kind: OwnerKind,

    /// Human-readable identifier usable in URLs.
    pub slug: Option<String>,

    /// Principal this owner record belongs to, when linked directly.
    pub principal_id: Option<PrincipalId>,

    /// External billing customer paying for this owner.
    pub billing_customer: Option<CustomerRef>,
}

impl Owner {
    /// Creates an owner with no slug, principal link or billing customer.
    pub fn new(id: OwnerId, kind: OwnerKind) -> Self {
        Self {
            id,
            kind,
            slug: None,
            principal_id: None,
            billing_customer: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_principal(mut self, principal_id: PrincipalId) -> Self {
        self.principal_id = Some(principal_id);
        self
    }

    pub fn with_billing_customer(mut self, customer: CustomerRef) -> Self {
        self.billing_customer = Some(customer);
        self
    }

    /// URL parameter for this owner: the slug when present, else the id.
    pub fn to_param(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.is_empty() => slug.clone(),
            _ => self.id.to_string(),
        }
    }
}
