//! Port abstraction for direct-message persistence.

use async_trait::async_trait;

use crate::domain::{Error, Message, MessageId, MessageStats, NewMessage, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by message repository adapters.
    pub enum MessagePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "message repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "message repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, message: &NewMessage) -> Result<Message, MessagePersistenceError>;

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, MessagePersistenceError>;

    /// Messages sent or received by `user_id`, newest first with ties broken
    /// by descending id.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Message>, MessagePersistenceError>;

    /// Set the read flag. Returns `None` when the message does not exist.
    async fn mark_read(&self, id: MessageId) -> Result<Option<Message>, MessagePersistenceError>;

    /// Read and unread counts over messages received by `user_id`.
    async fn received_stats(&self, user_id: UserId) -> Result<MessageStats, MessagePersistenceError>;
}

impl From<MessagePersistenceError> for Error {
    fn from(err: MessagePersistenceError) -> Self {
        match err {
            MessagePersistenceError::Connection { message }
            | MessagePersistenceError::Query { message } => Error::internal(message),
        }
    }
}
