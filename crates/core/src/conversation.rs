//! Conversation-related types.

use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person asking questions.
    User,
    /// The advisor service, including failure notices shown in its place.
    Advisor,
}

/// Unique identifier of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    #[inline]
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// One turn in the conversation. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(role: Role, content: String) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            created_at: Utc::now(),
        }
    }

    /// Returns the identifier of this message.
    #[inline]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the author of this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this message.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when this message was created.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Where the conversation is in its request cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Ready to accept a new query.
    #[default]
    Idle,
    /// A query is in flight.
    AwaitingResponse,
}

/// The visible state of a conversation.
///
/// The log only ever grows: messages are appended in chronological order
/// and are never reordered, edited or removed. Only the controller that
/// owns the state mutates it; everyone else works on snapshots.
#[derive(Clone, Debug, Default)]
pub struct ConversationState {
    log: Vec<Message>,
    pending: bool,
    sidebar_text: String,
}

impl ConversationState {
    /// Returns every message, oldest first.
    #[inline]
    pub fn log(&self) -> &[Message] {
        &self.log
    }

    /// Returns `true` while a query is in flight.
    #[inline]
    pub fn pending(&self) -> bool {
        self.pending
    }

    /// Returns the auxiliary text of the most recently completed query.
    /// Empty when there is none or when that query failed.
    #[inline]
    pub fn sidebar_text(&self) -> &str {
        &self.sidebar_text
    }

    /// Returns the current stage of the request cycle.
    #[inline]
    pub fn stage(&self) -> Stage {
        if self.pending {
            Stage::AwaitingResponse
        } else {
            Stage::Idle
        }
    }

    /// Returns `true` if nothing has been said yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Appends the user message and enters [`Stage::AwaitingResponse`].
    pub(crate) fn begin(&mut self, text: String) {
        debug_assert!(!self.pending, "a query is already in flight");
        self.log.push(Message::new(Role::User, text));
        self.pending = true;
    }

    /// Appends the advisor message, replaces the sidebar and returns to
    /// [`Stage::Idle`].
    pub(crate) fn finish(&mut self, content: String, sidebar_text: String) {
        self.log.push(Message::new(Role::Advisor, content));
        self.sidebar_text = sidebar_text;
        self.pending = false;
    }
}
