//! NewSubscriptionHandler - the subscribe form, or the way to it.
//!
//! Owner-scoped requests render a prepared subscription. Requests from the
//! pricing page carry no owner: signed-in principals are sent to their
//! owner's form, anonymous visitors to registration.

use std::sync::Arc;

use crate::domain::foundation::PlanId;
use crate::domain::plan::Plan;
use crate::domain::subscription::{SubscriptionDraft, SubscriptionError};
use crate::ports::{PlanReader, SignUpFlow, SubscriptionRepository};

use super::guard::existing_subscription_redirect;
use super::{ActionOutcome, OwnerContext, Redirect, SubscriptionPaths, View};

#[derive(Debug, Clone)]
pub struct NewSubscriptionQuery {
    pub context: OwnerContext,
    /// Plan chosen on the pricing page: a plan id or billing-provider id.
    pub plan: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBody {
    pub subscription: SubscriptionDraft,
    pub plan: Option<Plan>,
}

pub struct NewSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanReader>,
    sign_up: Option<Arc<dyn SignUpFlow>>,
    sign_up_scope: String,
    paths: SubscriptionPaths,
}

impl NewSubscriptionHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanReader>,
        sign_up: Option<Arc<dyn SignUpFlow>>,
        sign_up_scope: impl Into<String>,
        paths: SubscriptionPaths,
    ) -> Self {
        Self {
            repository,
            plans,
            sign_up,
            sign_up_scope: sign_up_scope.into(),
            paths,
        }
    }

    pub async fn handle(
        &self,
        query: NewSubscriptionQuery,
    ) -> Result<ActionOutcome<NewBody>, SubscriptionError> {
        let context = query.context;
        let plan_param = query.plan.as_deref().map(str::trim).filter(|p| !p.is_empty());

        if let Some(redirect) =
            existing_subscription_redirect(self.repository.as_ref(), &self.paths, &context).await?
        {
            return Ok(ActionOutcome::redirect(redirect));
        }

        if let Some(owner) = context.scoped_owner() {
            let plan = match plan_param {
                Some(stripe_id) => self.plans.find_by_stripe_id(stripe_id).await?,
                None => None,
            };
            let subscription =
                SubscriptionDraft::for_owner(owner.id).with_plan(plan.as_ref().map(|p| p.id));
            return Ok(ActionOutcome::render(
                View::New,
                NewBody { subscription, plan },
            ));
        }

        let Some(sign_up) = &self.sign_up else {
            tracing::error!("Unscoped new subscription requested but no sign-up flow is configured");
            return Err(SubscriptionError::misconfigured("sign_up_flow"));
        };

        if let Some(current) = &context.current_owner {
            return Ok(ActionOutcome::redirect(Redirect::to(
                self.paths.new_for_owner(current, plan_param),
            )));
        }

        self.redirect_to_sign_up(sign_up.as_ref(), plan_param)
            .await
            .map(ActionOutcome::redirect)
    }

    async fn redirect_to_sign_up(
        &self,
        sign_up: &dyn SignUpFlow,
        plan_param: Option<&str>,
    ) -> Result<Redirect, SubscriptionError> {
        let plan = match plan_param {
            Some(reference) => self.find_plan(reference).await?,
            None => None,
        };

        let Some(plan) = plan else {
            return Ok(Redirect::to(sign_up.default_registration_path()));
        };

        let redirect = Redirect::to(sign_up.registration_path(&self.sign_up_scope, Some(&plan)));
        if plan.is_free() {
            Ok(redirect)
        } else {
            let plan_id = plan.id.to_string();
            Ok(redirect.with_return_to(self.paths.unscoped_new(Some(&plan_id))))
        }
    }

    /// Plan by id, falling back to the billing-provider id.
    async fn find_plan(&self, reference: &str) -> Result<Option<Plan>, SubscriptionError> {
        if let Ok(id) = reference.parse::<PlanId>() {
            if let Some(plan) = self.plans.find_by_id(id).await? {
                return Ok(Some(plan));
            }
        }
        Ok(self.plans.find_by_stripe_id(reference).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::test_support::*;
    use crate::domain::foundation::OwnerId;
    use crate::domain::owner::{AccessGrant, ResolvedOwner};

    fn handler(
        repo: MockSubscriptionRepository,
        sign_up: Option<Arc<dyn SignUpFlow>>,
    ) -> NewSubscriptionHandler {
        NewSubscriptionHandler::new(
            Arc::new(repo),
            Arc::new(MockPlanReader::new(vec![plan(1, 0), plan(2, 900)])),
            sign_up,
            "user",
            SubscriptionPaths::new("").unwrap(),
        )
    }

    fn with_sign_up() -> Option<Arc<dyn SignUpFlow>> {
        Some(Arc::new(MockSignUpFlow))
    }

    fn query(context: OwnerContext, plan: Option<&str>) -> NewSubscriptionQuery {
        NewSubscriptionQuery {
            context,
            plan: plan.map(str::to_string),
        }
    }

    fn scoped(id: i64) -> OwnerContext {
        OwnerContext {
            current_owner: Some(owner(id)),
            resolved: ResolvedOwner::Scoped {
                owner: owner(id),
                grant: AccessGrant::SameOwner,
            },
        }
    }

    fn redirect(outcome: ActionOutcome<NewBody>) -> Redirect {
        match outcome {
            ActionOutcome::Redirect(redirect) => redirect,
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Unscoped
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unscoped_without_sign_up_flow_is_misconfigured() {
        let result = handler(MockSubscriptionRepository::new(), None)
            .handle(query(OwnerContext::unscoped(None), Some("2")))
            .await;

        assert_eq!(result, Err(SubscriptionError::misconfigured("sign_up_flow")));
    }

    #[tokio::test]
    async fn signed_in_principal_is_sent_to_owner_form() {
        let outcome = handler(MockSubscriptionRepository::new(), with_sign_up())
            .handle(query(OwnerContext::unscoped(Some(owner(5))), Some("plan_2")))
            .await
            .unwrap();

        assert_eq!(
            outcome.location(),
            Some("/owners/5/subscriptions/new?plan=plan_2")
        );
    }

    #[tokio::test]
    async fn anonymous_paid_plan_records_return_path() {
        let outcome = handler(MockSubscriptionRepository::new(), with_sign_up())
            .handle(query(OwnerContext::unscoped(None), Some("2")))
            .await
            .unwrap();

        let redirect = redirect(outcome);
        assert_eq!(redirect.location, "/user/sign_up?plan=2");
        assert_eq!(redirect.return_to.as_deref(), Some("/subscriptions/new?plan=2"));
    }

    #[tokio::test]
    async fn anonymous_free_plan_has_no_return_path() {
        let outcome = handler(MockSubscriptionRepository::new(), with_sign_up())
            .handle(query(OwnerContext::unscoped(None), Some("plan_1")))
            .await
            .unwrap();

        let redirect = redirect(outcome);
        assert_eq!(redirect.location, "/user/sign_up?plan=1");
        assert!(redirect.return_to.is_none());
    }

    #[tokio::test]
    async fn anonymous_unknown_plan_goes_to_plain_registration() {
        let outcome = handler(MockSubscriptionRepository::new(), with_sign_up())
            .handle(query(OwnerContext::unscoped(None), Some("platinum")))
            .await
            .unwrap();

        assert_eq!(outcome.location(), Some("/sign_up"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Scoped
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn scoped_request_renders_draft_with_plan_from_stripe_id() {
        let outcome = handler(MockSubscriptionRepository::new(), None)
            .handle(query(scoped(5), Some("plan_2")))
            .await
            .unwrap();

        match outcome {
            ActionOutcome::Render(render) => {
                assert_eq!(render.view, View::New);
                assert_eq!(render.body.subscription.owner_id, OwnerId::new(5));
                assert_eq!(render.body.plan.map(|p| p.id.value()), Some(2));
            }
            other => panic!("expected render, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn scoped_request_with_unknown_plan_renders_empty_draft() {
        let outcome = handler(MockSubscriptionRepository::new(), None)
            .handle(query(scoped(5), Some("2")))
            .await
            .unwrap();

        match outcome {
            ActionOutcome::Render(render) => assert!(render.body.plan.is_none()),
            other => panic!("expected render, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn scoped_owner_with_subscription_is_sent_to_show() {
        let repo = MockSubscriptionRepository::with(vec![subscription(7, 5, Some(2))]);

        let outcome = handler(repo, None)
            .handle(query(scoped(5), None))
            .await
            .unwrap();

        assert_eq!(outcome.location(), Some("/owners/5/subscriptions/7"));
    }
}
