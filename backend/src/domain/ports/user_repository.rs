//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Error, NewUser, Role, User, UserAccount, UserDeletionReport, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DuplicateEmail` on collision.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch an account, credentials included, by normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the users among `ids` that exist, in no particular order.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError>;

    /// Every user, ascending id.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Change a user's role. Returns `None` when the user does not exist.
    async fn update_role(&self, id: UserId, role: Role)
    -> Result<Option<User>, UserPersistenceError>;

    /// Remove the user's sent and received messages, their favourites and
    /// then the user, atomically. Returns `None` when the user is absent.
    async fn delete_cascade(
        &self,
        id: UserId,
    ) -> Result<Option<UserDeletionReport>, UserPersistenceError>;
}

impl From<UserPersistenceError> for Error {
    fn from(err: UserPersistenceError) -> Self {
        match err {
            UserPersistenceError::Connection { message } | UserPersistenceError::Query { message } => {
                Error::internal(message)
            }
            UserPersistenceError::DuplicateEmail { .. } => Error::conflict("Email already exists"),
        }
    }
}
