//! Subscription repository port.
//!
//! Defines the contract for persisting and retrieving subscriptions.
//!
//! # Design
//!
//! - **Owner-scoped reads**: subscriptions are always looked up within an
//!   owner, never by id alone
//! - **One per owner**: `insert` rejects a second subscription for an owner
//! - **No deletes**: cancellation is an update

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OwnerId, SubscriptionId};
use crate::domain::subscription::{Subscription, SubscriptionDraft};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Persist a new subscription and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// - `SubscriptionExists` if the owner already has one
    /// - `ValidationFailed` if the draft violates record constraints
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, draft: &SubscriptionDraft) -> Result<Subscription, DomainError>;

    /// Update an existing subscription.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if it doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Find a subscription by id, restricted to one owner.
    async fn find_for_owner(
        &self,
        owner_id: OwnerId,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Find the subscription held by an owner, if any.
    async fn find_by_owner(&self, owner_id: OwnerId) -> Result<Option<Subscription>, DomainError>;
}
