//! IndexSubscriptionsHandler - the pricing page.

use std::sync::Arc;

use crate::domain::plan::{Plan, PlanOrdering};
use crate::domain::subscription::{SubscriptionDraft, SubscriptionError};
use crate::ports::{PlanReader, SubscriptionRepository};

use super::guard::existing_subscription_redirect;
use super::{
    ActionOutcome, ListPlansHandler, ListPlansQuery, OwnerContext, Redirect, SubscriptionPaths,
    View,
};

#[derive(Debug, Clone)]
pub struct IndexSubscriptionsQuery {
    pub context: OwnerContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBody {
    pub plans: Vec<Plan>,
    /// Unsaved subscription prepared for the owner named in the path.
    pub subscription: Option<SubscriptionDraft>,
}

pub struct IndexSubscriptionsHandler {
    repository: Arc<dyn SubscriptionRepository>,
    plans: ListPlansHandler,
    paths: SubscriptionPaths,
}

impl IndexSubscriptionsHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanReader>,
        paths: SubscriptionPaths,
    ) -> Self {
        Self {
            repository,
            plans: ListPlansHandler::new(plans),
            paths,
        }
    }

    pub async fn handle(
        &self,
        query: IndexSubscriptionsQuery,
    ) -> Result<ActionOutcome<IndexBody>, SubscriptionError> {
        let context = query.context;

        if let Some(redirect) =
            existing_subscription_redirect(self.repository.as_ref(), &self.paths, &context).await?
        {
            return Ok(ActionOutcome::redirect(redirect));
        }

        // Owners who already subscribed manage their plan on the edit page.
        if let Some(current) = &context.current_owner {
            if let Some(existing) = self.repository.find_by_owner(current.id).await? {
                return Ok(ActionOutcome::redirect(Redirect::to(
                    self.paths.edit(current, existing.id),
                )));
            }
        }

        let plans = self
            .plans
            .handle(ListPlansQuery {
                ordering: PlanOrdering::DisplayOrder,
            })
            .await?;
        // Only an owner named in the path gets a prepared draft.
        let subscription = context
            .scoped_owner()
            .map(|o| SubscriptionDraft::for_owner(o.id));

        Ok(ActionOutcome::render(
            View::Index,
            IndexBody {
                plans,
                subscription,
            },
        ))
    }
}
