//! In-memory subscription repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, OwnerId, SubscriptionId, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionDraft};
use crate::ports::SubscriptionRepository;

#[derive(Default)]
struct Store {
    subscriptions: Vec<Subscription>,
    next_id: i64,
}

/// Ids are assigned sequentially starting at 1.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    store: RwLock<Store>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored subscriptions.
    pub async fn all(&self) -> Vec<Subscription> {
        self.store.read().await.subscriptions.clone()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn insert(&self, draft: &SubscriptionDraft) -> Result<Subscription, DomainError> {
        draft.validate()?;

        let mut store = self.store.write().await;
        if store.subscriptions.iter().any(|s| s.owner_id == draft.owner_id) {
            return Err(DomainError::new(
                ErrorCode::SubscriptionExists,
                format!("Owner {} already has a subscription", draft.owner_id),
            )
            .with_detail("field", "owner_id"));
        }

        store.next_id += 1;
        let subscription = Subscription::from_draft(
            SubscriptionId::new(store.next_id),
            draft.clone(),
            Timestamp::now(),
        );
        store.subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let existing = store
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription.id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::SubscriptionNotFound,
                    format!("Subscription {} not found", subscription.id),
                )
            })?;
        *existing = subscription.clone();
        Ok(())
    }

    async fn find_for_owner(
        &self,
        owner_id: OwnerId,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .subscriptions
            .iter()
            .find(|s| s.owner_id == owner_id && s.id == id)
            .cloned())
    }

    async fn find_by_owner(&self, owner_id: OwnerId) -> Result<Option<Subscription>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .subscriptions
            .iter()
            .find(|s| s.owner_id == owner_id)
            .cloned())
    }
}
