//! Administration of user accounts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{UserAdministration, UserRepository};
use crate::domain::{Error, Role, User, UserId};

/// Service implementing the [`UserAdministration`] driving port.
#[derive(Clone)]
pub struct UserAdminService<U> {
    users: Arc<U>,
}

impl<U> UserAdminService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

fn user_not_found() -> Error {
    Error::not_found("User not found")
}

#[async_trait]
impl<U> UserAdministration for UserAdminService<U>
where
    U: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(self.users.list_all().await?)
    }

    async fn change_role(&self, id: UserId, role: Role) -> Result<User, Error> {
        let user = self
            .users
            .update_role(id, role)
            .await?
            .ok_or_else(user_not_found)?;
        info!(user_id = %id, role = %role, "user role changed");
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        let report = self
            .users
            .delete_cascade(id)
            .await?
            .ok_or_else(user_not_found)?;
        info!(
            user_id = %id,
            messages_removed = report.messages_removed,
            favorites_removed = report.favorites_removed,
            "user deleted"
        );
        Ok(())
    }
}
