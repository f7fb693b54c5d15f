//! PostgreSQL implementation of PlanReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId};
use crate::domain::plan::{Plan, PlanOrdering};
use crate::ports::PlanReader;

const PLAN_COLUMNS: &str = "id, name, price_cents, display_order, stripe_id";

pub struct PostgresPlanReader {
    pool: PgPool,
}

impl PostgresPlanReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: i64,
    name: String,
    price_cents: i64,
    display_order: i32,
    stripe_id: String,
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        Plan {
            id: PlanId::new(row.id),
            name: row.name,
            price_cents: row.price_cents,
            display_order: row.display_order,
            stripe_id: row.stripe_id,
        }
    }
}

fn query_error(e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to read plans: {}", e))
}

#[async_trait]
impl PlanReader for PostgresPlanReader {
    async fn list(&self, ordering: PlanOrdering) -> Result<Vec<Plan>, DomainError> {
        let sql = format!(
            "SELECT {} FROM plans ORDER BY {}",
            PLAN_COLUMNS,
            ordering.order_by()
        );
        let rows: Vec<PlanRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(rows.into_iter().map(Plan::from).collect())
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError> {
        let sql = format!("SELECT {} FROM plans WHERE id = $1", PLAN_COLUMNS);
        let row: Option<PlanRow> = sqlx::query_as(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(row.map(Plan::from))
    }

    async fn find_by_stripe_id(&self, stripe_id: &str) -> Result<Option<Plan>, DomainError> {
        let sql = format!("SELECT {} FROM plans WHERE stripe_id = $1", PLAN_COLUMNS);
        let row: Option<PlanRow> = sqlx::query_as(&sql)
            .bind(stripe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(row.map(Plan::from))
    }
}
