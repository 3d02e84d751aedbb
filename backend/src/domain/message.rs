//! Direct messages between users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::non_empty;
use super::{Error, MessageId, UserId, UserSummary};

/// A stored message. Only `is_read` ever changes, and only from false to
/// true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Message ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
}

impl NewMessage {
    /// Validate the content, which must be non-blank once trimmed.
    pub fn try_new(sender_id: UserId, receiver_id: UserId, content: &str) -> Result<Self, Error> {
        Ok(Self {
            sender_id,
            receiver_id,
            content: non_empty("content", content)?,
        })
    }
}

/// Message together with both participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageThreadEntry {
    pub id: MessageId,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender: UserSummary,
    pub receiver: UserSummary,
}

/// Read/unread counts over the messages a user received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageStats {
    pub read_count: u64,
    pub unread_count: u64,
}

/// Newest first, ties broken by descending id.
pub fn sort_newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, MessageId)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    fn content_is_trimmed() {
        let msg = NewMessage::try_new(UserId::new(1), UserId::new(2), "  hi there ").expect("ok");
        assert_eq!(msg.content, "hi there");
    }

    #[rstest]
    fn blank_content_is_rejected() {
        assert!(NewMessage::try_new(UserId::new(1), UserId::new(2), " \n ").is_err());
    }

    #[rstest]
    fn ordering_is_newest_first_then_id_desc() {
        let t0 = Utc::now();
        let mut items = vec![
            (t0, MessageId::new(1)),
            (t0 + Duration::seconds(1), MessageId::new(2)),
            (t0, MessageId::new(3)),
        ];
        sort_newest_first(&mut items, |item| *item);
        let ids: Vec<i32> = items.iter().map(|(_, id)| id.get()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
