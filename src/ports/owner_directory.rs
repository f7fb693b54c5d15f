//! Owner directory port.
//!
//! Looks up owner records of the configured owner kind. Lookups never
//! mutate anything; resolution may call them any number of times.
//!
//! # Design
//!
//! - **Primary key first**: `find_by_id` is always available
//! - **Slug lookup is optional**: directories declare it through
//!   [`LookupCapabilities`] instead of failing at call time

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OwnerId, PrincipalId};
use crate::domain::owner::{Owner, OwnerKind};

/// Optional lookups a directory supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LookupCapabilities {
    /// Owners can be found by their friendly slug.
    pub slug_lookup: bool,
}

impl LookupCapabilities {
    pub fn with_slug_lookup(mut self, enabled: bool) -> Self {
        self.slug_lookup = enabled;
        self
    }
}

/// Read access to owner records.
#[async_trait]
pub trait OwnerDirectory: Send + Sync {
    /// Kind of owner this directory holds.
    fn kind(&self) -> OwnerKind;

    /// Lookups supported beyond `find_by_id`.
    fn capabilities(&self) -> LookupCapabilities;

    /// Find an owner by primary identifier.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: OwnerId) -> Result<Option<Owner>, DomainError>;

    /// Find an owner by friendly slug.
    ///
    /// Only called when `capabilities().slug_lookup` is set.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Owner>, DomainError>;

    /// Find the owner record linked to a principal.
    async fn find_for_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Option<Owner>, DomainError>;
}
