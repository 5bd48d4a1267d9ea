//! PostgreSQL implementation of SessionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::identity::{Session, SessionToken};
use crate::ports::SessionRepository;

use super::{db_error, write_error};

/// PostgreSQL implementation of SessionRepository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    token: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            token: SessionToken::from_string(row.token),
            user_id: UserId::from_uuid(row.user_id),
            expires_at: Timestamp::from_datetime(row.expires_at),
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        // Plain INSERT: a duplicate token must fail, never rebind.
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.token.as_str())
        .bind(session.user_id.as_uuid())
        .bind(session.expires_at.as_datetime())
        .bind(session.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "create session"))?;

        Ok(())
    }

    async fn find_by_token(&self, token: &SessionToken) -> Result<Option<Session>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT token, user_id, expires_at, created_at
            FROM sessions WHERE token = $1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch session"))?;

        Ok(row.map(Session::from))
    }

    async fn delete_by_token(&self, token: &SessionToken) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete session"))?;

        Ok(())
    }
}
