//! Conversation-related types.

use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use support_chat_model::HistoryEntry;
pub use support_chat_model::Role;

/// Identifies a message within its transcript.
///
/// Ids are taken from the creation time in milliseconds and bumped when
/// needed so that they strictly increase along the transcript.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    /// Returns the raw value of this id.
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}

/// A turn in the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    role: Role,
    text: String,
    created_at: DateTime<Utc>,
    failed: bool,
}

impl Message {
    /// Returns the id of this message.
    #[inline]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Returns who authored this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the display text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when this message was appended.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` if this message stands in for a reply that never
    /// arrived.
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

/// The ordered list of messages of one chat session.
///
/// Messages are only ever appended.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    last_id: u64,
}

impl Transcript {
    /// Creates a transcript that opens with a responder greeting.
    pub fn with_greeting<S: Into<String>>(greeting: S) -> Self {
        let mut transcript = Self::default();
        transcript.push(Role::Responder, greeting.into(), false);
        transcript
    }

    /// Returns all messages, in insertion order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if there are no messages at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the latest message.
    #[inline]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns the context to send along with the next request: the
    /// latest `limit` messages with some text, oldest first.
    ///
    /// Failed exchanges are left out as a whole, i.e. the failed reply and
    /// the requester message it answered.
    pub fn context_window(&self, limit: usize) -> Vec<HistoryEntry> {
        let mut window: Vec<_> = self
            .messages
            .iter()
            .enumerate()
            .rev()
            .filter(|(idx, msg)| {
                !msg.failed
                    && !msg.text.trim().is_empty()
                    && !self.is_answered_by_failure(*idx)
            })
            .map(|(_, msg)| msg)
            .take(limit)
            .map(|msg| HistoryEntry::new(msg.role, msg.text.clone()))
            .collect();
        window.reverse();
        window
    }

    fn is_answered_by_failure(&self, idx: usize) -> bool {
        if self.messages[idx].role != Role::Requester {
            return false;
        }
        self.messages
            .get(idx + 1)
            .is_some_and(|next| next.role == Role::Responder && next.failed)
    }

    pub(crate) fn push(
        &mut self,
        role: Role,
        text: String,
        failed: bool,
    ) -> &Message {
        self.push_at(role, text, failed, Utc::now())
    }

    fn push_at(
        &mut self,
        role: Role,
        text: String,
        failed: bool,
        created_at: DateTime<Utc>,
    ) -> &Message {
        let millis = u64::try_from(created_at.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;

        self.messages.push(Message {
            id: MessageId(id),
            role,
            text,
            created_at,
            failed,
        });
        &self.messages[self.messages.len() - 1]
    }
}
