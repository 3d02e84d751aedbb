//! Sign-up, login and bearer-token verification.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{Accounts, PasswordHasher, TokenService, UserRepository};
use crate::domain::{
    AccessToken, AuthenticatedUser, Error, ErrorCode, LoginCredentials, NewUser, Registration,
    User,
};

/// Account service implementing the [`Accounts`] driving port.
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> AccountService<U, H, T> {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("Invalid credentials")
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn create(&self, registration: &Registration) -> Result<User, Error> {
        let password_hash = self.hasher.hash(registration.password())?;
        let new_user = NewUser {
            email: registration.email().clone(),
            name: registration.name().to_owned(),
            password_hash,
            role: registration.role(),
        };
        Ok(self.users.insert(&new_user).await?)
    }
}

#[async_trait]
impl<U, H, T> Accounts for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<AccessToken, Error> {
        let user = self.create(&registration).await?;
        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(self.tokens.issue(&user)?)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AccessToken, Error> {
        let Some(account) = self.users.find_by_email(credentials.email()).await? else {
            debug!("login attempt for unknown email");
            return Err(invalid_credentials());
        };
        if !self
            .hasher
            .verify(credentials.password(), &account.password_hash)?
        {
            debug!(user_id = %account.user.id, "login attempt with wrong password");
            return Err(invalid_credentials());
        }
        Ok(self.tokens.issue(&account.user)?)
    }

    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        Ok(self.tokens.verify(token)?)
    }

    async fn ensure_account(&self, registration: Registration) -> Result<bool, Error> {
        if self
            .users
            .find_by_email(registration.email().as_ref())
            .await?
            .is_some()
        {
            return Ok(false);
        }
        match self.create(&registration).await {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "account created");
                Ok(true)
            }
            Err(err) if err.code() == ErrorCode::Conflict => Ok(false),
            Err(err) => Err(err),
        }
    }
}
