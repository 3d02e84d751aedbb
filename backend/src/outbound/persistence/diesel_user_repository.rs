//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Emails are stored lowercased; the unique index on `users.email` backs
//! the duplicate-email check, surfaced as
//! [`UserPersistenceError::DuplicateEmail`].

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUser, Role, User, UserAccount, UserDeletionReport, UserId};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::row_count;
use super::schema::{favorites, messages, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_role(row: &UserRow) -> Role {
    Role::from_str(&row.role).unwrap_or_else(|_| {
        warn!(
            value = %row.role,
            user_id = row.id,
            "unrecognised role value, defaulting to viewer"
        );
        Role::Viewer
    })
}

fn row_to_user(row: UserRow) -> User {
    let role = parse_role(&row);
    User {
        id: UserId::new(row.id),
        email: Email::from_trusted(row.email),
        name: row.name,
        role,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_account(row: UserRow) -> UserAccount {
    let password_hash = row.password_hash.clone();
    UserAccount {
        user: row_to_user(row),
        password_hash,
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            email: user.email.as_ref(),
            name: &user.name,
            password_hash: &user.password_hash,
            role: user.role.as_str(),
        };
        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_email(user.email.to_string())
                } else {
                    map_diesel_error(err)
                }
            })?;
        Ok(row_to_user(inserted))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.to_lowercase()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_account))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_user))
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(raw))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn update_role(
        &self,
        id: UserId,
        role: Role,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(id.get()))
            .set((users::role.eq(role.as_str()), users::updated_at.eq(Utc::now())))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_user))
    }

    async fn delete_cascade(
        &self,
        id: UserId,
    ) -> Result<Option<UserDeletionReport>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = id.get();

        conn.transaction(|conn| {
            async move {
                let messages_removed = diesel::delete(
                    messages::table.filter(
                        messages::sender_id
                            .eq(user_id)
                            .or(messages::receiver_id.eq(user_id)),
                    ),
                )
                .execute(conn)
                .await?;
                let favorites_removed =
                    diesel::delete(favorites::table.filter(favorites::user_id.eq(user_id)))
                        .execute(conn)
                        .await?;
                let deleted = diesel::delete(users::table.find(user_id))
                    .execute(conn)
                    .await?;

                if deleted == 0 {
                    return Ok(None);
                }
                Ok(Some(UserDeletionReport {
                    messages_removed: row_count(messages_removed),
                    favorites_removed: row_count(favorites_removed),
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
