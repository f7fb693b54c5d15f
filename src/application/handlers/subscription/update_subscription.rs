//! UpdateSubscriptionHandler - plan switches and card updates.
//!
//! Moving from a free plan to a paid one needs a card token; without one
//! the owner is sent back to the edit page's card form.

use std::sync::Arc;

use crate::domain::foundation::PlanId;
use crate::domain::owner::AccessDenial;
use crate::domain::plan::{Plan, PlanOrdering};
use crate::domain::subscription::{SubscriptionError, SubscriptionParams};
use crate::ports::{PlanReader, SubscriptionRepository};

use super::messages;
use super::{
    ActionOutcome, EditBody, Flash, LoadSubscriptionHandler, LoadSubscriptionQuery, OwnerContext,
    Redirect, SubscriptionPaths, View,
};

#[derive(Debug, Clone)]
pub struct UpdateSubscriptionCommand {
    pub context: OwnerContext,
    pub subscription_param: String,
    pub params: SubscriptionParams,
}

pub struct UpdateSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanReader>,
    loader: LoadSubscriptionHandler,
    paths: SubscriptionPaths,
}

impl UpdateSubscriptionHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanReader>,
        paths: SubscriptionPaths,
    ) -> Self {
        Self {
            loader: LoadSubscriptionHandler::new(repository.clone()),
            repository,
            plans,
            paths,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateSubscriptionCommand,
    ) -> Result<ActionOutcome<EditBody>, SubscriptionError> {
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

        let new_plan_id = cmd
            .params
            .plan_id
            .ok_or_else(|| SubscriptionError::plan_not_found("(none)"))?;
        let new_plan = self
            .plans
            .find_by_id(new_plan_id)
            .await?
            .ok_or_else(|| SubscriptionError::plan_not_found(new_plan_id.to_string()))?;

        if self.current_plan_is_free(subscription.plan_id).await?
            && !new_plan.is_free()
            && cmd.params.credit_card_token.is_none()
        {
            return Ok(ActionOutcome::redirect(
                Redirect::to(self.paths.edit_for_card(
                    &owner,
                    subscription.id,
                    &new_plan_id.to_string(),
                ))
                .with_flash(Flash::notice(messages::PAYMENT_REQUIRED)),
            ));
        }

        let saved = match subscription.apply(cmd.params) {
            Ok(()) => self
                .repository
                .update(&subscription)
                .await
                .map_err(SubscriptionError::from),
            Err(err) => Err(SubscriptionError::from(err)),
        };

        match saved {
            Ok(()) => {
                tracing::info!(
                    owner = %owner.id,
                    subscription = %subscription.id,
                    plan = %new_plan.id,
                    "Subscription updated"
                );
                Ok(ActionOutcome::redirect(
                    Redirect::to(self.paths.edit(&owner, subscription.id))
                        .with_flash(Flash::notice(messages::UPDATED)),
                ))
            }
            Err(SubscriptionError::ValidationFailed { field, message }) => {
                tracing::warn!(subscription = %subscription.id, %field, %message, "Update rejected");
                let plans = self.plans.list(PlanOrdering::Price).await?;
                Ok(ActionOutcome::render_with_flash(
                    View::Edit,
                    Flash::error(messages::TRANSACTION_PROBLEM),
                    EditBody {
                        subscription,
                        plans,
                    },
                ))
            }
            Err(other) => Err(other),
        }
    }

    /// A subscription without a plan (cancelled) counts as free.
    async fn current_plan_is_free(
        &self,
        plan_id: Option<PlanId>,
    ) -> Result<bool, SubscriptionError> {
        let current: Option<Plan> = match plan_id {
            Some(id) => self.plans.find_by_id(id).await?,
            None => None,
        };
        Ok(current.map_or(true, |plan| plan.is_free()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::test_support::*;
    use crate::domain::owner::{AccessGrant, ResolvedOwner};

    fn scoped(id: i64) -> OwnerContext {
        OwnerContext {
            current_owner: Some(owner(id)),
            resolved: ResolvedOwner::Scoped {
                owner: owner(id),
                grant: AccessGrant::SameOwner,
            },
        }
    }

    fn handler(repo: Arc<MockSubscriptionRepository>) -> UpdateSubscriptionHandler {
        UpdateSubscriptionHandler::new(
            repo,
            Arc::new(MockPlanReader::new(vec![plan(1, 0), plan(2, 900), plan(3, 1900)])),
            SubscriptionPaths::new("").unwrap(),
        )
    }

    fn command(plan_id: Option<i64>, token: Option<&str>) -> UpdateSubscriptionCommand {
        UpdateSubscriptionCommand {
            context: scoped(5),
            subscription_param: "7".to_string(),
            params: SubscriptionParams {
                plan_id: plan_id.map(PlanId::new),
                credit_card_token: token.map(str::to_string),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn free_to_paid_without_card_asks_for_payment() {
        let repo = Arc::new(MockSubscriptionRepository::with(vec![subscription(7, 5, Some(1))]));

        let outcome = handler(repo.clone()).handle(command(Some(2), None)).await.unwrap();

        assert_eq!(
            outcome.location(),
            Some("/owners/5/subscriptions/7/edit?update=card&plan=2")
        );
        assert_eq!(outcome.flash(), Some(&Flash::notice(messages::PAYMENT_REQUIRED)));
        assert_eq!(repo.all()[0].plan_id, Some(PlanId::new(1)));
    }

    #[tokio::test]
    async fn free_to_paid_with_card_updates() {
        let repo = Arc::new(MockSubscriptionRepository::with(vec![subscription(7, 5, Some(1))]));

        let outcome = handler(repo.clone())
            .handle(command(Some(2), Some("tok_visa")))
            .await
            .unwrap();

        assert_eq!(outcome.location(), Some("/owners/5/subscriptions/7/edit"));
        assert_eq!(outcome.flash(), Some(&Flash::notice(messages::UPDATED)));
        assert_eq!(repo.all()[0].plan_id, Some(PlanId::new(2)));
    }

    #[tokio::test]
    async fn paid_to_paid_needs_no_card() {
        let repo = Arc::new(MockSubscriptionRepository::with(vec![subscription(7, 5, Some(2))]));

        handler(repo.clone()).handle(command(Some(3), None)).await.unwrap();

        assert_eq!(repo.all()[0].plan_id, Some(PlanId::new(3)));
    }

    #[tokio::test]
    async fn cancelled_subscription_upgrading_needs_card() {
        let repo = Arc::new(MockSubscriptionRepository::with(vec![subscription(7, 5, None)]));

        let outcome = handler(repo).handle(command(Some(2), None)).await.unwrap();

        assert_eq!(outcome.flash(), Some(&Flash::notice(messages::PAYMENT_REQUIRED)));
    }

    #[tokio::test]
    async fn unknown_plan_is_not_found() {
        let repo = Arc::new(MockSubscriptionRepository::with(vec![subscription(7, 5, Some(1))]));

        let result = handler(repo).handle(command(Some(99), None)).await;

        assert_eq!(result, Err(SubscriptionError::plan_not_found("99")));
    }

    #[tokio::test]
    async fn missing_plan_is_not_found() {
        let repo = Arc::new(MockSubscriptionRepository::with(vec![subscription(7, 5, Some(1))]));

        let result = handler(repo).handle(command(None, None)).await;

        assert!(matches!(result, Err(SubscriptionError::PlanNotFound(_))));
    }

    #[tokio::test]
    async fn save_failure_rerenders_edit() {
        let repo = Arc::new(
            MockSubscriptionRepository::with(vec![subscription(7, 5, Some(2))]).failing_writes(),
        );

        let outcome = handler(repo).handle(command(Some(3), None)).await.unwrap();

        match outcome {
            ActionOutcome::Render(render) => {
                assert_eq!(render.view, View::Edit);
                assert_eq!(render.flash, Some(Flash::error(messages::TRANSACTION_PROBLEM)));
                assert_eq!(render.body.plans.len(), 3);
            }
            other => panic!("expected render, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn invalid_card_details_rerender_edit() {
        let repo = Arc::new(MockSubscriptionRepository::with(vec![subscription(7, 5, Some(2))]));
        let mut cmd = command(Some(3), None);
        cmd.params.last_four = Some("42".to_string());

        let outcome = handler(repo.clone()).handle(cmd).await.unwrap();

        assert!(matches!(outcome, ActionOutcome::Render(_)));
        assert_eq!(repo.all()[0].plan_id, Some(PlanId::new(2)));
    }
}
