//! Directory-backed current-owner accessor.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Principal};
use crate::domain::owner::{Owner, OwnerKind};
use crate::ports::{CurrentOwnerAccessor, OwnerAccessorRegistry, OwnerDirectory};

/// Finds the owner record linked to the principal.
pub struct DirectoryOwnerAccessor {
    directory: Arc<dyn OwnerDirectory>,
}

impl DirectoryOwnerAccessor {
    pub fn new(directory: Arc<dyn OwnerDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl CurrentOwnerAccessor for DirectoryOwnerAccessor {
    async fn current_owner(&self, principal: &Principal) -> Result<Option<Owner>, DomainError> {
        let owner = self.directory.find_for_principal(&principal.id).await?;
        if owner.is_none() {
            tracing::debug!(principal = %principal.id.as_str(), "Principal has no owner record");
        }
        Ok(owner)
    }
}

/// Registry holding the accessor for the directory's owner kind under its
/// conventional name (`current_user`, `current_account`, ...).
pub fn default_accessor_registry(directory: Arc<dyn OwnerDirectory>) -> OwnerAccessorRegistry {
    let kind: OwnerKind = directory.kind();
    OwnerAccessorRegistry::new().register(
        kind.default_accessor(),
        Arc::new(DirectoryOwnerAccessor::new(directory)),
    )
}
