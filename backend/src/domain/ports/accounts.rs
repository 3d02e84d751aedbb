//! Driving port for sign-up, login and token verification.

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthenticatedUser, Error, LoginCredentials, Registration};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Accounts: Send + Sync {
    /// Create an account and sign a token for it.
    ///
    /// # Errors
    ///
    /// `conflict` when the email is taken.
    async fn register(&self, registration: Registration) -> Result<AccessToken, Error>;

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// `unauthorized` for an unknown email or a wrong password alike.
    async fn login(&self, credentials: LoginCredentials) -> Result<AccessToken, Error>;

    /// Resolve a bearer token to its caller.
    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error>;

    /// Create the account unless one with the same email exists. Returns
    /// whether an account was created.
    async fn ensure_account(&self, registration: Registration) -> Result<bool, Error>;
}
