//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, Email, ErrorCode, Timestamp, UserId};
use crate::domain::identity::{PasswordHash, User};
use crate::ports::UserRepository;

use super::{db_error, write_error};

/// PostgreSQL implementation of the UserRepository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Identity columns of a `users` row.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored email: {}", e))
        })?;

        Ok(User {
            id: UserId::from_uuid(row.id),
            email,
            name: row.name,
            password_hash: PasswordHash::from_phc(row.password_hash),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(user.password_hash.as_str())
        .bind(user.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "create user"))?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET email = $2, name = $3
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.name)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "update user"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch user"))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users WHERE lower(email) = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch user"))?;

        row.map(User::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: Some("Ada".to_string()),
            password_hash: "$argon2id$stub".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn stored_row_becomes_user() {
        let row = row("ada@example.com");
        let id = row.id;

        let user = User::try_from(row).unwrap();

        assert_eq!(user.id, UserId::from_uuid(id));
        assert_eq!(user.email.as_str(), "ada@example.com");
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(user.password_hash.as_str(), "$argon2id$stub");
    }

    #[test]
    fn corrupt_stored_email_is_a_database_error() {
        let err = User::try_from(row("not-an-email")).unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("Invalid stored email"));
    }
}
