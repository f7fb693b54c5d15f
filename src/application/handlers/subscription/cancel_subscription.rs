//! CancelSubscriptionHandler - clears the plan of a subscription.

use std::sync::Arc;

use crate::domain::owner::AccessDenial;
use crate::domain::subscription::SubscriptionError;
use crate::ports::SubscriptionRepository;

use super::messages;
use super::{
    ActionOutcome, Flash, LoadSubscriptionHandler, LoadSubscriptionQuery, OwnerContext, Redirect,
    SubscriptionPaths,
};

#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub context: OwnerContext,
    pub subscription_param: String,
}

/// Cancelling keeps the record and only drops the plan reference.
pub struct CancelSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
    loader: LoadSubscriptionHandler,
    paths: SubscriptionPaths,
}

impl CancelSubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>, paths: SubscriptionPaths) -> Self {
        Self {
            loader: LoadSubscriptionHandler::new(repository.clone()),
            repository,
            paths,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<ActionOutcome<()>, SubscriptionError> {
        let owner = cmd
            .context
            .owner()
            .cloned()
            .ok_or(SubscriptionError::unauthorized(AccessDenial::NoPrincipalOwner))?;

        let mut subscription = self
            .loader
            .handle(LoadSubscriptionQuery {
                context: cmd.context,
                subscription_param: cmd.subscription_param,
            })
            .await?;

        subscription.cancel();
        self.repository.update(&subscription).await?;

        tracing::info!(owner = %owner.id, subscription = %subscription.id, "Subscription cancelled");

        Ok(ActionOutcome::redirect(
            Redirect::to(self.paths.show(&owner, subscription.id))
                .with_flash(Flash::notice(messages::CANCELLED)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::test_support::*;
    use crate::domain::owner::{AccessGrant, ResolvedOwner};
    use crate::domain::subscription::SubscriptionStatus;

    fn scoped(id: i64) -> OwnerContext {
        OwnerContext {
            current_owner: Some(owner(id)),
            resolved: ResolvedOwner::Scoped {
                owner: owner(id),
                grant: AccessGrant::SameOwner,
            },
        }
    }

    #[tokio::test]
    async fn cancel_clears_plan_and_redirects_to_show() {
        let repo = Arc::new(MockSubscriptionRepository::with(vec![subscription(7, 5, Some(2))]));
        let handler = CancelSubscriptionHandler::new(repo.clone(), SubscriptionPaths::new("").unwrap());

        let outcome = handler
            .handle(CancelSubscriptionCommand {
                context: scoped(5),
                subscription_param: "7".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.location(), Some("/owners/5/subscriptions/7"));
        assert_eq!(outcome.flash(), Some(&Flash::notice(messages::CANCELLED)));
        let stored = repo.all();
        assert!(stored[0].plan_id.is_none());
        assert_eq!(stored[0].status(), SubscriptionStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancel_of_foreign_subscription_is_unauthorized() {
        let repo = Arc::new(MockSubscriptionRepository::with(vec![subscription(7, 42, Some(2))]));
        let handler = CancelSubscriptionHandler::new(repo.clone(), SubscriptionPaths::new("").unwrap());

        let result = handler
            .handle(CancelSubscriptionCommand {
                context: scoped(5),
                subscription_param: "7".to_string(),
            })
            .await;

        assert!(matches!(result, Err(SubscriptionError::Unauthorized(_))));
        assert!(repo.all()[0].plan_id.is_some());
    }
}
