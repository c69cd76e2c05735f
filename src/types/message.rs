use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{Category, Sender};

/// One entry in a chat transcript.
///
/// Messages are immutable once created. The `category` is assigned by
/// keyword classification for bot replies, is always [`Category::User`] for
/// user messages, and is absent on the fallback apology shown when a chat
/// request fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier unique within the owning session.
    pub id: String,

    /// Message body.
    pub text: String,

    /// Who wrote the message.
    pub sender: Sender,

    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,

    /// Topic tag, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Message {
    /// Creates a user message stamped with the current time.
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::User,
            timestamp: OffsetDateTime::now_utc(),
            category: Some(Category::User),
        }
    }

    /// Creates a bot message stamped with the current time.
    pub fn bot(id: impl Into<String>, text: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::Bot,
            timestamp: OffsetDateTime::now_utc(),
            category,
        }
    }

    /// Returns true if the responder wrote this message.
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    /// Returns true if the user wrote this message.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
