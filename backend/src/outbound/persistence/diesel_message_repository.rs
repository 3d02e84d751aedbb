//! PostgreSQL-backed `MessageRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MessagePersistenceError, MessageRepository};
use crate::domain::{Message, MessageId, MessageStats, NewMessage, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MessageRow, NewMessageRow};
use super::pool::DbPool;
use super::schema::messages;

/// Diesel-backed implementation of the `MessageRepository` port.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_message(row: MessageRow) -> Message {
    Message {
        id: MessageId::new(row.id),
        content: row.content,
        sender_id: UserId::new(row.sender_id),
        receiver_id: UserId::new(row.receiver_id),
        is_read: row.is_read,
        created_at: row.created_at,
    }
}

/// `COUNT(*)` is never negative.
fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn insert(&self, message: &NewMessage) -> Result<Message, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMessageRow {
            content: &message.content,
            sender_id: message.sender_id.get(),
            receiver_id: message.receiver_id.get(),
        };
        let inserted: MessageRow = diesel::insert_into(messages::table)
            .values(&row)
            .returning(MessageRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_message(inserted))
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MessageRow> = messages::table
            .find(id.get())
            .select(MessageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_message))
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Message>, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw = user_id.get();
        let rows: Vec<MessageRow> = messages::table
            .filter(messages::sender_id.eq(raw).or(messages::receiver_id.eq(raw)))
            .order((messages::created_at.desc(), messages::id.desc()))
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_message).collect())
    }

    async fn mark_read(&self, id: MessageId) -> Result<Option<Message>, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MessageRow> = diesel::update(messages::table.find(id.get()))
            .set(messages::is_read.eq(true))
            .returning(MessageRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_message))
    }

    async fn received_stats(&self, user_id: UserId) -> Result<MessageStats, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let receiver = user_id.get();

        let read: i64 = messages::table
            .filter(messages::receiver_id.eq(receiver))
            .filter(messages::is_read.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let unread: i64 = messages::table
            .filter(messages::receiver_id.eq(receiver))
            .filter(messages::is_read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(MessageStats {
            read_count: count_to_u64(read),
            unread_count: count_to_u64(unread),
        })
    }
}
