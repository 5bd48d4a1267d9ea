//! Identity module - users, sessions and credentials.
//!
//! Sessions are opaque bearer tokens backed by a stored row; nothing is
//! encoded in the token itself. Password verifiers are Argon2id PHC strings.

mod errors;
mod password;
mod session;
mod token;
mod user;

pub use errors::AuthError;
pub use password::{PasswordHash, PasswordHasher};
pub use session::Session;
pub use token::{SessionToken, TOKEN_LENGTH};
pub use user::{AuthenticatedUser, User};
