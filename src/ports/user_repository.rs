//! Credential store port.
//!
//! Users are keyed by id and uniquely by lower-cased email. Subscription
//! fields that share the physical row are reached through
//! `SubscriptionLedger`, never through this port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Email, UserId};
use crate::domain::identity::User;

/// Repository port for user identity records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a newly registered user with subscription status `none`.
    ///
    /// # Errors
    ///
    /// - `EmailTaken` if another user already has this email
    /// - `DatabaseError` on persistence failure
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Update name and email of an existing user.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user doesn't exist
    /// - `EmailTaken` if the new email belongs to a different user
    /// - `DatabaseError` on persistence failure
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Find a user by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by email. Returns `None` if not found.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError>;
}
