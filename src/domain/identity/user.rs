//! User aggregate and the authenticated-caller view of it.

use crate::domain::foundation::{Email, Timestamp, UserId};

use super::PasswordHash;

/// Identity record owned by the credential store.
///
/// Subscription fields are stored alongside it physically but belong to
/// the subscription ledger; see `SubscriptionState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: Option<String>,
    pub password_hash: PasswordHash,
    pub created_at: Timestamp,
}

impl User {
    /// Creates a newly registered user.
    pub fn register(
        email: Email,
        name: Option<String>,
        password_hash: PasswordHash,
        now: Timestamp,
    ) -> Self {
        Self {
            id: UserId::new(),
            email,
            name: normalize_name(name),
            password_hash,
            created_at: now,
        }
    }

    /// Sets the display name. Blank names clear it.
    pub fn rename(&mut self, name: Option<String>) {
        self.name = normalize_name(name);
    }

    pub fn change_email(&mut self, email: Email) {
        self.email = email;
    }
}

fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// The caller behind a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: Email,
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or_else(|| self.email.as_str())
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>) -> User {
        User::register(
            Email::parse("a@x.com").unwrap(),
            name.map(String::from),
            PasswordHash::from_phc("$argon2id$stub"),
            Timestamp::now(),
        )
    }

    #[test]
    fn blank_name_is_stored_as_absent() {
        assert_eq!(user(Some("   ")).name, None);
        assert_eq!(user(Some(" Ada ")).name, Some("Ada".to_string()));
    }

    #[test]
    fn rename_replaces_name() {
        let mut u = user(Some("Ada"));
        u.rename(Some("Grace".to_string()));
        assert_eq!(u.name.as_deref(), Some("Grace"));
        u.rename(None);
        assert_eq!(u.name, None);
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let named = AuthenticatedUser::from(&user(Some("Ada")));
        let anonymous = AuthenticatedUser::from(&user(None));

        assert_eq!(named.display_name_or_email(), "Ada");
        assert_eq!(anonymous.display_name_or_email(), "a@x.com");
    }
}
