//! Driving port for direct messages.

use async_trait::async_trait;

use crate::domain::{Error, Message, MessageId, MessageStats, MessageThreadEntry, NewMessage, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messaging: Send + Sync {
    /// Deliver a message after checking both participants exist.
    async fn send(&self, message: NewMessage) -> Result<Message, Error>;

    /// Conversation history of `user_id`, newest first.
    async fn list(&self, user_id: UserId) -> Result<Vec<MessageThreadEntry>, Error>;

    /// Mark a message read on behalf of `caller`, who must be its receiver.
    async fn mark_read(&self, caller: UserId, id: MessageId) -> Result<Message, Error>;

    async fn stats(&self, user_id: UserId) -> Result<MessageStats, Error>;
}
