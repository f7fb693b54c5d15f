//! PostgreSQL implementation of SubscriptionRepository.
//!
//! Provides persistent storage for subscriptions using PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{
    DomainError, ErrorCode, OwnerId, PlanId, SubscriptionId, Timestamp,
};
use crate::domain::subscription::{BillingDetails, Subscription, SubscriptionDraft};
use crate::ports::SubscriptionRepository;

const OWNER_UNIQUE_CONSTRAINT: &str = "subscriptions_owner_id_key";

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: i64,
    owner_id: i64,
    plan_id: Option<i64>,
    stripe_id: Option<String>,
    current_price: Option<i64>,
    credit_card_token: Option<String>,
    card_type: Option<String>,
    last_four: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            id: SubscriptionId::new(row.id),
            owner_id: OwnerId::new(row.owner_id),
            plan_id: row.plan_id.map(PlanId::new),
            billing: BillingDetails {
                stripe_id: row.stripe_id,
                current_price: row.current_price,
                credit_card_token: row.credit_card_token,
                card_type: row.card_type,
                last_four: row.last_four,
            },
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

fn query_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {} subscription: {}", action, e),
    )
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn insert(&self, draft: &SubscriptionDraft) -> Result<Subscription, DomainError> {
        draft.validate().map_err(|e| {
            DomainError::validation(e.field().to_string(), e.to_string())
        })?;

        let now = Timestamp::now();
        let row: SubscriptionRow = sqlx::query_as(
            r#"
            INSERT INTO subscriptions (
                owner_id, plan_id, stripe_id, current_price, credit_card_token,
                card_type, last_four, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, owner_id, plan_id, stripe_id, current_price, credit_card_token,
                      card_type, last_four, created_at, updated_at
            "#,
        )
        .bind(draft.owner_id.value())
        .bind(draft.plan_id.map(|id| id.value()))
        .bind(&draft.billing.stripe_id)
        .bind(draft.billing.current_price)
        .bind(&draft.billing.credit_card_token)
        .bind(&draft.billing.card_type)
        .bind(&draft.billing.last_four)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(OWNER_UNIQUE_CONSTRAINT) {
                    return DomainError::new(
                        ErrorCode::SubscriptionExists,
                        format!("Owner {} already has a subscription", draft.owner_id),
                    )
                    .with_detail("field", "owner_id");
                }
            }
            query_error("insert", e)
        })?;

        Ok(row.into())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                plan_id = $3,
                stripe_id = $4,
                current_price = $5,
                credit_card_token = $6,
                card_type = $7,
                last_four = $8,
                updated_at = $9
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(subscription.id.value())
        .bind(subscription.owner_id.value())
        .bind(subscription.plan_id.map(|id| id.value()))
        .bind(&subscription.billing.stripe_id)
        .bind(subscription.billing.current_price)
        .bind(&subscription.billing.credit_card_token)
        .bind(&subscription.billing.card_type)
        .bind(&subscription.billing.last_four)
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| query_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription not found: {}", subscription.id),
            ));
        }

        Ok(())
    }

    async fn find_for_owner(
        &self,
        owner_id: OwnerId,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, plan_id, stripe_id, current_price, credit_card_token,
                   card_type, last_four, created_at, updated_at
            FROM subscriptions
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.value())
        .bind(owner_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error("find", e))?;

        Ok(row.map(Subscription::from))
    }

    async fn find_by_owner(&self, owner_id: OwnerId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, plan_id, stripe_id, current_price, credit_card_token,
                   card_type, last_four, created_at, updated_at
            FROM subscriptions
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error("find", e))?;

        Ok(row.map(Subscription::from))
    }
}
