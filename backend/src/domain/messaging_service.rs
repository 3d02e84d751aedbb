//! Direct messaging between users.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{MessageRepository, Messaging, UserRepository};
use crate::domain::{
    Error, Message, MessageId, MessageStats, MessageThreadEntry, NewMessage, UserId, UserSummary,
};

/// Service implementing the [`Messaging`] driving port.
#[derive(Clone)]
pub struct MessagingService<M, U> {
    messages: Arc<M>,
    users: Arc<U>,
}

impl<M, U> MessagingService<M, U> {
    pub fn new(messages: Arc<M>, users: Arc<U>) -> Self {
        Self { messages, users }
    }
}

impl<M, U> MessagingService<M, U>
where
    M: MessageRepository,
    U: UserRepository,
{
    async fn require_user(&self, id: UserId, not_found: &str) -> Result<(), Error> {
        match self.users.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(not_found)),
        }
    }
}

fn thread_entry(
    message: Message,
    people: &HashMap<UserId, UserSummary>,
) -> Result<MessageThreadEntry, Error> {
    let lookup = |id: UserId| {
        people
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::internal(format!("message participant {id} is missing")))
    };
    Ok(MessageThreadEntry {
        sender: lookup(message.sender_id)?,
        receiver: lookup(message.receiver_id)?,
        id: message.id,
        content: message.content,
        is_read: message.is_read,
        created_at: message.created_at,
    })
}

#[async_trait]
impl<M, U> Messaging for MessagingService<M, U>
where
    M: MessageRepository,
    U: UserRepository,
{
    async fn send(&self, message: NewMessage) -> Result<Message, Error> {
        self.require_user(message.sender_id, "Sender not found").await?;
        self.require_user(message.receiver_id, "Receiver not found").await?;
        let stored = self.messages.insert(&message).await?;
        info!(
            message_id = %stored.id,
            sender_id = %stored.sender_id,
            receiver_id = %stored.receiver_id,
            "message sent"
        );
        Ok(stored)
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<MessageThreadEntry>, Error> {
        let messages = self.messages.list_for_user(user_id).await?;
        let mut ids: Vec<UserId> = messages
            .iter()
            .flat_map(|message| [message.sender_id, message.receiver_id])
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let people: HashMap<UserId, UserSummary> = self
            .users
            .find_many(&ids)
            .await?
            .iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect();
        messages
            .into_iter()
            .map(|message| thread_entry(message, &people))
            .collect()
    }

    async fn mark_read(&self, caller: UserId, id: MessageId) -> Result<Message, Error> {
        let message = self
            .messages
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Message not found"))?;
        if message.receiver_id != caller {
            return Err(Error::forbidden("Only the receiver can mark a message as read"));
        }
        if message.is_read {
            return Ok(message);
        }
        self.messages
            .mark_read(id)
            .await?
            .ok_or_else(|| Error::not_found("Message not found"))
    }

    async fn stats(&self, user_id: UserId) -> Result<MessageStats, Error> {
        Ok(self.messages.received_stats(user_id).await?)
    }
}
