//! Current owner port.
//!
//! Maps the authenticated principal to the owner record the request acts
//! for by default ("current account", "current company", ...). Hosts can
//! register several accessors; configuration picks one by name at startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Principal};
use crate::domain::owner::Owner;

/// Produces the principal's own owner record.
#[async_trait]
pub trait CurrentOwnerAccessor: Send + Sync {
    /// Returns `None` when the principal has no owner record yet.
    async fn current_owner(&self, principal: &Principal) -> Result<Option<Owner>, DomainError>;
}

/// Named accessors available to configuration.
#[derive(Clone, Default)]
pub struct OwnerAccessorRegistry {
    accessors: HashMap<String, Arc<dyn CurrentOwnerAccessor>>,
}

impl OwnerAccessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an accessor, replacing any previous one with that name.
    pub fn register(
        mut self,
        name: impl Into<String>,
        accessor: Arc<dyn CurrentOwnerAccessor>,
    ) -> Self {
        self.accessors.insert(name.into(), accessor);
        self
    }

    /// Looks up an accessor by name.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn CurrentOwnerAccessor>> {
        self.accessors.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.accessors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for OwnerAccessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerAccessorRegistry")
            .field("accessors", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoOwner;

    #[async_trait]
    impl CurrentOwnerAccessor for NoOwner {
        async fn current_owner(&self, _: &Principal) -> Result<Option<Owner>, DomainError> {
            Ok(None)
        }
    }

    #[test]
    fn registry_resolves_registered_names() {
        let registry = OwnerAccessorRegistry::new()
            .register("current_user", Arc::new(NoOwner))
            .register("current_account", Arc::new(NoOwner));

        assert!(registry.resolve("current_account").is_some());
        assert!(registry.resolve("current_team").is_none());
        assert_eq!(registry.names(), vec!["current_account", "current_user"]);
    }
}
