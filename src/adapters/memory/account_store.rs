//! In-memory credential store and subscription ledger.
//!
//! One map holds both the identity record and the subscription state, the
//! same way the PostgreSQL adapter keeps them on one row. The write lock
//! makes each ledger transition atomic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Email, ErrorCode, UserId};
use crate::domain::identity::User;
use crate::domain::subscription::{
    OrderingPolicy, SubscriptionState, SubscriptionTransition, TransitionOutcome,
};
use crate::ports::{SubscriptionLedger, UserRepository};

#[derive(Debug, Clone)]
struct AccountRecord {
    user: User,
    subscription: SubscriptionState,
}

/// In-memory users plus their subscription state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<UserId, AccountRecord>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(email: &Email) -> DomainError {
    DomainError::new(ErrorCode::EmailTaken, "Email is already registered")
        .with_detail("email", email.as_str())
}

#[async_trait]
impl UserRepository for InMemoryAccountStore {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.user.email == user.email) {
            return Err(email_taken(&user.email));
        }
        accounts.insert(
            user.id,
            AccountRecord {
                user: user.clone(),
                subscription: SubscriptionState::default(),
            },
        );
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .values()
            .any(|a| a.user.email == user.email && a.user.id != user.id)
        {
            return Err(email_taken(&user.email));
        }
        let record = accounts
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?;
        record.user.email = user.email.clone();
        record.user.name = user.name.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).map(|a| a.user.clone()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| &a.user.email == email)
            .map(|a| a.user.clone()))
    }
}

#[async_trait]
impl SubscriptionLedger for InMemoryAccountStore {
    async fn apply_transition(
        &self,
        transition: &SubscriptionTransition,
        policy: OrderingPolicy,
    ) -> Result<TransitionOutcome, DomainError> {
        let mut accounts = self.accounts.write().await;
        let record = match accounts
            .values_mut()
            .find(|a| a.user.email == transition.email)
        {
            Some(record) => record,
            None => return Ok(TransitionOutcome::UserNotFound),
        };

        match record.subscription.apply(transition, policy) {
            Ok(next) => {
                record.subscription = next.clone();
                Ok(TransitionOutcome::Applied(next))
            }
            Err(stale) => Ok(TransitionOutcome::Stale {
                last_event_at: stale.last_event_at,
            }),
        }
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SubscriptionState>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(user_id).map(|a| a.subscription.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::identity::PasswordHash;
    use crate::domain::subscription::{SubscriptionStatus, TransitionSource};

    fn user(email: &str) -> User {
        User::register(
            Email::parse(email).unwrap(),
            None,
            PasswordHash::from_phc("$argon2id$stub"),
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = InMemoryAccountStore::new();
        let first = user("a@x.com");
        store.create(&first).await.unwrap();

        let err = store.create(&user("A@x.com")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::EmailTaken);
        let email = Email::parse("a@x.com").unwrap();
        let stored = store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
    }

    #[tokio::test]
    async fn update_rejects_email_of_other_user() {
        let store = InMemoryAccountStore::new();
        let mut a = user("a@x.com");
        store.create(&a).await.unwrap();
        store.create(&user("b@x.com")).await.unwrap();

        a.change_email(Email::parse("b@x.com").unwrap());
        let err = store.update(&a).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::EmailTaken);
    }

    #[tokio::test]
    async fn update_of_missing_user_is_not_found() {
        let store = InMemoryAccountStore::new();
        let err = store.update(&user("a@x.com")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn transition_is_applied_by_email() {
        let store = InMemoryAccountStore::new();
        let a = user("a@x.com");
        store.create(&a).await.unwrap();

        let outcome = store
            .apply_transition(
                &SubscriptionTransition {
                    email: Email::parse("A@X.com").unwrap(),
                    status: SubscriptionStatus::Trialing,
                    customer_id: Some("cus_9".to_string()),
                    expires_at: None,
                    observed_at: Timestamp::now(),
                    source: TransitionSource::Webhook,
                },
                OrderingPolicy::RejectStale,
            )
            .await
            .unwrap();

        assert!(outcome.is_applied());
        let state = store.find_by_user(&a.id).await.unwrap().unwrap();
        assert_eq!(state.status, SubscriptionStatus::Trialing);
        assert_eq!(state.external_customer_id.as_deref(), Some("cus_9"));
    }
}
