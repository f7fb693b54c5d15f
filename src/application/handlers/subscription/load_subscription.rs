//! LoadSubscriptionHandler - finds a subscription within the owners in scope.

use std::sync::Arc;

use crate::domain::foundation::{OwnerId, SubscriptionId};
use crate::domain::owner::AccessDenial;
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::SubscriptionRepository;

use super::OwnerContext;

#[derive(Debug, Clone)]
pub struct LoadSubscriptionQuery {
    pub context: OwnerContext,
    /// Subscription identifier from the path.
    pub subscription_param: String,
}

/// Looks the subscription up under the principal's own owner first, then
/// under the resolved owner. A subscription outside both is unauthorized,
/// never "not found", so ids of other owners are not revealed.
pub struct LoadSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl LoadSubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: LoadSubscriptionQuery) -> Result<Subscription, SubscriptionError> {
        let Ok(id) = query.subscription_param.trim().parse::<SubscriptionId>() else {
            return Err(SubscriptionError::unauthorized(AccessDenial::SubscriptionOutOfScope));
        };

        let mut scopes: Vec<OwnerId> = Vec::with_capacity(2);
        if let Some(current) = &query.context.current_owner {
            scopes.push(current.id);
        }
        if let Some(owner) = query.context.owner() {
            if !scopes.contains(&owner.id) {
                scopes.push(owner.id);
            }
        }

        for owner_id in scopes {
            if let Some(subscription) = self.repository.find_for_owner(owner_id, id).await? {
                return Ok(subscription);
            }
        }

        tracing::warn!(subscription = %id, "Subscription outside the owners in scope");
        Err(SubscriptionError::unauthorized(AccessDenial::SubscriptionOutOfScope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::test_support::*;
    use crate::domain::owner::{AccessGrant, ResolvedOwner};

    fn scoped(current: i64, resolved: i64) -> OwnerContext {
        OwnerContext {
            current_owner: Some(owner(current)),
            resolved: ResolvedOwner::Scoped {
                owner: owner(resolved),
                grant: AccessGrant::SharedCustomer,
            },
        }
    }

    fn query(context: OwnerContext, id: &str) -> LoadSubscriptionQuery {
        LoadSubscriptionQuery {
            context,
            subscription_param: id.to_string(),
        }
    }

    #[tokio::test]
    async fn finds_subscription_of_principal_owner() {
        let repo = MockSubscriptionRepository::with(vec![subscription(1, 5, Some(2))]);
        let handler = LoadSubscriptionHandler::new(Arc::new(repo));

        let found = handler.handle(query(scoped(5, 9), "1")).await.unwrap();

        assert_eq!(found.id, SubscriptionId::new(1));
    }

    #[tokio::test]
    async fn falls_back_to_resolved_owner() {
        let repo = MockSubscriptionRepository::with(vec![subscription(1, 9, Some(2))]);
        let handler = LoadSubscriptionHandler::new(Arc::new(repo));

        let found = handler.handle(query(scoped(5, 9), "1")).await.unwrap();

        assert_eq!(found.owner_id, OwnerId::new(9));
    }

    #[tokio::test]
    async fn subscription_of_other_owner_is_unauthorized() {
        let repo = MockSubscriptionRepository::with(vec![subscription(1, 42, Some(2))]);
        let handler = LoadSubscriptionHandler::new(Arc::new(repo));

        let result = handler.handle(query(scoped(5, 9), "1")).await;

        assert_eq!(
            result,
            Err(SubscriptionError::unauthorized(AccessDenial::SubscriptionOutOfScope))
        );
    }

    #[tokio::test]
    async fn malformed_id_is_unauthorized() {
        let handler = LoadSubscriptionHandler::new(Arc::new(MockSubscriptionRepository::new()));

        let result = handler.handle(query(scoped(5, 5), "abc")).await;

        assert!(matches!(result, Err(SubscriptionError::Unauthorized(_))));
    }
}
