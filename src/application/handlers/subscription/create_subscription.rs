//! CreateSubscriptionHandler - subscribes an owner to a plan.

use std::sync::Arc;

use crate::domain::owner::AccessDenial;
use crate::domain::subscription::{SubscriptionDraft, SubscriptionError, SubscriptionParams};
use crate::ports::{PlanReader, SubscriptionRepository};

use super::guard::existing_subscription_redirect;
use super::messages;
use super::{ActionOutcome, Flash, NewBody, OwnerContext, Redirect, SubscriptionPaths, View};

#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub context: OwnerContext,
    pub params: SubscriptionParams,
}

pub struct CreateSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanReader>,
    paths: SubscriptionPaths,
    notice: String,
}

impl CreateSubscriptionHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanReader>,
        paths: SubscriptionPaths,
    ) -> Self {
        Self {
            repository,
            plans,
            paths,
            notice: messages::UPGRADED.to_string(),
        }
    }

    /// Replaces the notice shown after a successful create.
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = notice.into();
        self
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<ActionOutcome<NewBody>, SubscriptionError> {
        let context = cmd.context;

        if let Some(redirect) =
            existing_subscription_redirect(self.repository.as_ref(), &self.paths, &context).await?
        {
            return Ok(ActionOutcome::redirect(redirect));
        }

        let owner = context
            .owner()
            .cloned()
            .ok_or(SubscriptionError::unauthorized(AccessDenial::NoPrincipalOwner))?;

        let draft = SubscriptionDraft::from_params(owner.id, cmd.params);
        let plan = match draft.plan_id {
            Some(id) => self.plans.find_by_id(id).await?,
            None => None,
        };

        let saved = match (&plan, draft.validate()) {
            (_, Err(err)) => Err(SubscriptionError::from(err)),
            (None, Ok(())) => Err(SubscriptionError::validation("plan_id", "does not exist")),
            (Some(_), Ok(())) => self
                .repository
                .insert(&draft)
                .await
                .map_err(SubscriptionError::from),
        };

        match saved {
            Ok(subscription) => {
                tracing::info!(
                    owner = %owner.id,
                    subscription = %subscription.id,
                    "Subscription created"
                );
                Ok(ActionOutcome::redirect(
                    Redirect::to(self.paths.after_create(&owner, subscription.id))
                        .with_flash(Flash::notice(self.notice.clone())),
                ))
            }
            Err(SubscriptionError::ValidationFailed { field, message }) => {
                tracing::warn!(owner = %owner.id, %field, %message, "Subscription rejected");
                Ok(ActionOutcome::render_with_flash(
                    View::New,
                    Flash::error(messages::TRANSACTION_PROBLEM),
                    NewBody {
                        subscription: draft,
                        plan,
                    },
                ))
            }
            Err(other) => Err(other),
        }
    }
}
