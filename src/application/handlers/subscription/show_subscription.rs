//! ShowSubscriptionHandler and EditSubscriptionHandler.

use std::sync::Arc;

use crate::domain::plan::{Plan, PlanOrdering};
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::{PlanReader, SubscriptionRepository};

use super::{
    ActionOutcome, ListPlansHandler, ListPlansQuery, LoadSubscriptionHandler,
    LoadSubscriptionQuery, OwnerContext, View,
};

#[derive(Debug, Clone)]
pub struct ShowSubscriptionQuery {
    pub context: OwnerContext,
    pub subscription_param: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowBody {
    pub subscription: Subscription,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBody {
    pub subscription: Subscription,
    /// Plans to switch to, cheapest first.
    pub plans: Vec<Plan>,
}

pub struct ShowSubscriptionHandler {
    loader: LoadSubscriptionHandler,
}

impl ShowSubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self {
            loader: LoadSubscriptionHandler::new(repository),
        }
    }

    pub async fn handle(
        &self,
        query: ShowSubscriptionQuery,
    ) -> Result<ActionOutcome<ShowBody>, SubscriptionError> {
        let subscription = self
            .loader
            .handle(LoadSubscriptionQuery {
                context: query.context,
                subscription_param: query.subscription_param,
            })
            .await?;

        Ok(ActionOutcome::render(View::Show, ShowBody { subscription }))
    }
}

pub struct EditSubscriptionHandler {
    loader: LoadSubscriptionHandler,
    plans: ListPlansHandler,
}

impl EditSubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>, plans: Arc<dyn PlanReader>) -> Self {
        Self {
            loader: LoadSubscriptionHandler::new(repository),
            plans: ListPlansHandler::new(plans),
        }
    }

    pub async fn handle(
        &self,
        query: ShowSubscriptionQuery,
    ) -> Result<ActionOutcome<EditBody>, SubscriptionError> {
        let subscription = self
            .loader
            .handle(LoadSubscriptionQuery {
                context: query.context,
                subscription_param: query.subscription_param,
            })
            .await?;
        let plans = self
            .plans
            .handle(ListPlansQuery {
                ordering: PlanOrdering::Price,
            })
            .await?;

        Ok(ActionOutcome::render(
            View::Edit,
            EditBody {
                subscription,
                plans,
            },
        ))
    }
}
