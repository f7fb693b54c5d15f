//! YAML seed data for in-memory runs.
//!
//! ```yaml
//! plans:
//!   - { id: 1, name: Free, price_cents: 0, display_order: 0, stripe_id: free }
//!   - { id: 2, name: Pro, price_cents: 1900, display_order: 1, stripe_id: pro }
//! owners:
//!   - { id: 5, slug: acme, principal_id: user-1, billing_customer: cus_1 }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::domain::foundation::{DomainError, ErrorCode, OwnerId, PrincipalId};
use crate::domain::owner::{CustomerRef, Owner, OwnerKind};
use crate::domain::plan::Plan;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub plans: Vec<Plan>,

    #[serde(default)]
    pub owners: Vec<OwnerSeed>,
}

/// Owner record as written in a seed file. The kind comes from
/// configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerSeed {
    pub id: i64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub principal_id: Option<String>,
    #[serde(default)]
    pub billing_customer: Option<String>,
}

impl OwnerSeed {
    pub fn into_owner(self, kind: OwnerKind) -> Result<Owner, DomainError> {
        let mut owner = Owner::new(OwnerId::new(self.id), kind);
        if let Some(slug) = self.slug {
            owner = owner.with_slug(slug);
        }
        if let Some(principal) = self.principal_id {
            owner = owner.with_principal(PrincipalId::new(principal)?);
        }
        if let Some(customer) = self.billing_customer {
            owner = owner.with_billing_customer(CustomerRef::new(customer)?);
        }
        Ok(owner)
    }
}

impl SeedData {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(yaml).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Invalid seed file: {}", e))
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Cannot read seed file {}: {}", path.display(), e),
            )
        })?;
        let seed = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            path = %path.display(),
            plans = seed.plans.len(),
            owners = seed.owners.len(),
            "Loaded seed data"
        );
        Ok(seed)
    }

    /// Owner records with the configured kind applied.
    pub fn owners(&self, kind: OwnerKind) -> Result<Vec<Owner>, DomainError> {
        self.owners
            .iter()
            .cloned()
            .map(|seed| seed.into_owner(kind))
            .collect()
    }
}
