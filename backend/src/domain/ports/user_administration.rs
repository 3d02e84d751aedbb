//! Driving port for the administration endpoints.

use async_trait::async_trait;

use crate::domain::{Error, Role, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdministration: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    async fn change_role(&self, id: UserId, role: Role) -> Result<User, Error>;

    /// Delete a user together with their messages and favourites.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}
