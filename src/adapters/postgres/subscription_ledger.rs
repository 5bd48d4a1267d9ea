//! PostgreSQL implementation of SubscriptionLedger.
//!
//! The subscription columns live on the `users` row. Each transition is a
//! read-modify-write under `SELECT ... FOR UPDATE`, so concurrent
//! deliveries for one user serialize and the stale check sees the latest
//! watermark.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::subscription::{
    OrderingPolicy, SubscriptionState, SubscriptionStatus, SubscriptionTransition,
    TransitionOutcome,
};
use crate::ports::SubscriptionLedger;

use super::db_error;

#[derive(Clone)]
pub struct PostgresSubscriptionLedger {
    pool: PgPool,
}

impl PostgresSubscriptionLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    id: uuid::Uuid,
    subscription_status: String,
    external_customer_id: Option<String>,
    subscription_expires_at: Option<DateTime<Utc>>,
    subscription_last_event_at: Option<DateTime<Utc>>,
}

impl LedgerRow {
    fn state(&self) -> Result<SubscriptionState, DomainError> {
        let status: SubscriptionStatus = self.subscription_status.parse().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid status value: {}", e))
        })?;

        Ok(SubscriptionState {
            status,
            expires_at: self.subscription_expires_at.map(Timestamp::from_datetime),
            external_customer_id: self.external_customer_id.clone(),
            last_event_at: self.subscription_last_event_at.map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl SubscriptionLedger for PostgresSubscriptionLedger {
    async fn apply_transition(
        &self,
        transition: &SubscriptionTransition,
        policy: OrderingPolicy,
    ) -> Result<TransitionOutcome, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let row: Option<LedgerRow> = sqlx::query_as(
            r#"
            SELECT id, subscription_status, external_customer_id,
                   subscription_expires_at, subscription_last_event_at
            FROM users WHERE lower(email) = $1
            FOR UPDATE
            "#,
        )
        .bind(transition.email.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("lock subscription row"))?;

        let Some(row) = row else {
            return Ok(TransitionOutcome::UserNotFound);
        };

        let next = match row.state()?.apply(transition, policy) {
            Ok(next) => next,
            Err(stale) => {
                return Ok(TransitionOutcome::Stale {
                    last_event_at: stale.last_event_at,
                })
            }
        };

        sqlx::query(
            r#"
            UPDATE users SET
                subscription_status = $2,
                external_customer_id = $3,
                subscription_expires_at = $4,
                subscription_last_event_at = $5
            WHERE id = $1
            "#,
        )
        .bind(row.id)
        .bind(next.status.as_str())
        .bind(&next.external_customer_id)
        .bind(next.expires_at.map(|t| *t.as_datetime()))
        .bind(next.last_event_at.map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(db_error("update subscription"))?;

        tx.commit().await.map_err(db_error("commit transaction"))?;

        Ok(TransitionOutcome::Applied(next))
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SubscriptionState>, DomainError> {
        let row: Option<LedgerRow> = sqlx::query_as(
            r#"
            SELECT id, subscription_status, external_customer_id,
                   subscription_expires_at, subscription_last_event_at
            FROM users WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch subscription"))?;

        row.map(|r| r.state()).transpose()
    }
}
