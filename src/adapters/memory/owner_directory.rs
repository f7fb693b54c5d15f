//! In-memory owner directory.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, OwnerId, PrincipalId};
use crate::domain::owner::{Owner, OwnerKind};
use crate::ports::{LookupCapabilities, OwnerDirectory};

/// Owners of one kind, held in memory.
///
/// Records of other kinds are ignored on insert so the directory always
/// answers for a single owner type.
pub struct InMemoryOwnerDirectory {
    kind: OwnerKind,
    capabilities: LookupCapabilities,
    owners: RwLock<Vec<Owner>>,
}

impl InMemoryOwnerDirectory {
    pub fn new(kind: OwnerKind) -> Self {
        Self {
            kind,
            capabilities: LookupCapabilities::default(),
            owners: RwLock::new(Vec::new()),
        }
    }

    pub fn with_slug_lookup(mut self, enabled: bool) -> Self {
        self.capabilities = self.capabilities.with_slug_lookup(enabled);
        self
    }

    pub fn with_owners(mut self, owners: impl IntoIterator<Item = Owner>) -> Self {
        let kind = self.kind;
        let records = self.owners.get_mut();
        for owner in owners {
            upsert(records, kind, owner);
        }
        self
    }

    /// Adds or replaces an owner record.
    pub async fn insert(&self, owner: Owner) {
        let mut owners = self.owners.write().await;
        upsert(&mut owners, self.kind, owner);
    }

    pub async fn len(&self) -> usize {
        self.owners.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn find(&self, predicate: impl Fn(&Owner) -> bool) -> Option<Owner> {
        self.owners.read().await.iter().find(|o| predicate(o)).cloned()
    }
}

fn upsert(owners: &mut Vec<Owner>, kind: OwnerKind, owner: Owner) {
    if owner.kind != kind {
        tracing::debug!(owner = %owner.id, kind = %owner.kind, "Skipping owner of another kind");
        return;
    }
    owners.retain(|o| o.id != owner.id);
    owners.push(owner);
}

#[async_trait]
impl OwnerDirectory for InMemoryOwnerDirectory {
    fn kind(&self) -> OwnerKind {
        self.kind
    }

    fn capabilities(&self) -> LookupCapabilities {
        self.capabilities
    }

    async fn find_by_id(&self, id: OwnerId) -> Result<Option<Owner>, DomainError> {
        Ok(self.find(|o| o.id == id).await)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Owner>, DomainError> {
        Ok(self.find(|o| o.slug.as_deref() == Some(slug)).await)
    }

    async fn find_for_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Option<Owner>, DomainError> {
        Ok(self
            .find(|o| o.principal_id.as_ref() == Some(principal_id))
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> InMemoryOwnerDirectory {
        InMemoryOwnerDirectory::new(OwnerKind::Account)
            .with_slug_lookup(true)
            .with_owners(vec![
                Owner::new(OwnerId::new(5), OwnerKind::Account)
                    .with_slug("acme")
                    .with_principal(PrincipalId::new("user-1").unwrap()),
                Owner::new(OwnerId::new(6), OwnerKind::User),
            ])
    }

    #[tokio::test]
    async fn finds_by_id_slug_and_principal() {
        let directory = directory();

        assert!(directory.find_by_id(OwnerId::new(5)).await.unwrap().is_some());
        assert!(directory.find_by_slug("acme").await.unwrap().is_some());
        assert!(directory
            .find_for_principal(&PrincipalId::new("user-1").unwrap())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn ignores_owners_of_other_kinds() {
        let directory = directory();

        assert_eq!(directory.len().await, 1);
        assert!(directory.find_by_id(OwnerId::new(6)).await.unwrap().is_none());
    }

    #[test]
    fn declares_slug_capability() {
        assert!(directory().capabilities().slug_lookup);
        assert!(!InMemoryOwnerDirectory::new(OwnerKind::User).capabilities().slug_lookup);
    }

    #[tokio::test]
    async fn insert_replaces_existing_record() {
        let directory = directory();
        directory
            .insert(Owner::new(OwnerId::new(5), OwnerKind::Account).with_slug("acme-2"))
            .await;

        assert_eq!(directory.len().await, 1);
        assert!(directory.find_by_slug("acme").await.unwrap().is_none());
        assert!(directory.find_by_slug("acme-2").await.unwrap().is_some());
    }
}
