//! Ports for password hashing and access-token handling.
//!
//! Both are CPU-bound and synchronous.

use crate::domain::{AccessToken, AuthenticatedUser, Error, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHashError {
        /// Hashing failed or a stored hash could not be parsed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

define_port_error! {
    /// Errors raised by token services.
    pub enum TokenError {
        /// The token is malformed, has a bad signature or has expired.
        Invalid { message: String } => "invalid token: {message}",
        /// A token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash string for storage.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a stored hash.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token identifying `user`.
    fn issue(&self, user: &User) -> Result<AccessToken, TokenError>;

    /// Verify a bearer token and recover the caller.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError>;
}

impl From<PasswordHashError> for Error {
    fn from(err: PasswordHashError) -> Self {
        Error::internal(err.to_string())
    }
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid { .. } => Error::unauthorized("Invalid or expired token"),
            TokenError::Signing { message } => Error::internal(message),
        }
    }
}
