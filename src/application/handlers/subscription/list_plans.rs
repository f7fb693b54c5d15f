//! ListPlansHandler - plan listings for the pricing and edit pages.

use std::sync::Arc;

use crate::domain::plan::{Plan, PlanOrdering};
use crate::domain::subscription::SubscriptionError;
use crate::ports::PlanReader;

#[derive(Debug, Clone, Copy, Default)]
pub struct ListPlansQuery {
    pub ordering: PlanOrdering,
}

pub struct ListPlansHandler {
    plans: Arc<dyn PlanReader>,
}

impl ListPlansHandler {
    pub fn new(plans: Arc<dyn PlanReader>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, query: ListPlansQuery) -> Result<Vec<Plan>, SubscriptionError> {
        let plans = self.plans.list(query.ordering).await?;
        tracing::debug!(count = plans.len(), ordering = ?query.ordering, "Listed plans");
        Ok(plans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::test_support::*;

    #[tokio::test]
    async fn lists_in_requested_order() {
        let handler = ListPlansHandler::new(Arc::new(MockPlanReader::new(vec![
            plan(1, 4900),
            plan(2, 0),
            plan(3, 1900),
        ])));

        let by_price = handler
            .handle(ListPlansQuery {
                ordering: PlanOrdering::Price,
            })
            .await
            .unwrap();
        let by_display = handler
            .handle(ListPlansQuery {
                ordering: PlanOrdering::DisplayOrder,
            })
            .await
            .unwrap();

        let ids = |plans: &[Plan]| plans.iter().map(|p| p.id.value()).collect::<Vec<_>>();
        assert_eq!(ids(&by_price), vec![2, 3, 1]);
        // display_order is 10 - id in the fixtures
        assert_eq!(ids(&by_display), vec![3, 2, 1]);
    }
}
