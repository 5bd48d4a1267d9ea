//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - identity columns of `users`
//! - `PostgresSubscriptionLedger` - subscription columns of `users`
//! - `PostgresSessionRepository` - `sessions` table
//!
//! Schema lives in `migrations/` and is applied with `run_migrations`.

mod session_repository;
mod subscription_ledger;
mod user_repository;

pub use session_repository::PostgresSessionRepository;
pub use subscription_ledger::PostgresSubscriptionLedger;
pub use user_repository::PostgresUserRepository;

use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Unique index on `lower(email)`.
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";
/// Primary key of `sessions`.
const SESSION_TOKEN_CONSTRAINT: &str = "sessions_pkey";

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Domain meaning of a violated unique constraint, if it has one.
fn unique_violation(constraint: Option<&str>) -> Option<DomainError> {
    match constraint? {
        EMAIL_UNIQUE_CONSTRAINT => Some(DomainError::new(
            ErrorCode::EmailTaken,
            "Email is already registered",
        )),
        SESSION_TOKEN_CONSTRAINT => Some(DomainError::new(
            ErrorCode::SessionTokenCollision,
            "Session token already exists",
        )),
        _ => None,
    }
}

fn write_error(e: sqlx::Error, action: &str) -> DomainError {
    let constraint = match &e {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    };
    unique_violation(constraint)
        .unwrap_or_else(|| DomainError::database(format!("Failed to {}: {}", action, e)))
}

fn db_error(action: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::database(format!("Failed to {}: {}", action, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_index_violation_is_email_taken() {
        let err = unique_violation(Some("users_email_key")).unwrap();
        assert_eq!(err.code, ErrorCode::EmailTaken);
    }

    #[test]
    fn session_key_violation_is_token_collision() {
        let err = unique_violation(Some("sessions_pkey")).unwrap();
        assert_eq!(err.code, ErrorCode::SessionTokenCollision);
    }

    #[test]
    fn other_constraints_have_no_domain_meaning() {
        assert!(unique_violation(Some("users_pkey")).is_none());
        assert!(unique_violation(None).is_none());
    }

    #[test]
    fn non_database_errors_become_database_errors() {
        let err = write_error(sqlx::Error::RowNotFound, "create user");
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("create user"));
    }
}
