//! Bounded conversation log.
//!
//! The log holds one session's messages in insertion order and enforces
//! the capacity invariant after every append. Cleanup removes the
//! oldest messages two at a time so a question is never separated from
//! its answer at the front of the log.

use crate::error::Result;
use crate::session::message::{ChatMessage, MessageMetadata, MessageRole};
use serde::{Deserialize, Serialize};

/// Maximum number of messages retained in one session's log.
pub const MAX_MESSAGES: usize = 50;

/// The ordered message sequence owned by one session.
///
/// Insertion order is chronological order; timestamps are clamped so
/// they never decrease across the sequence even if the wall clock does.
///
/// # Examples
///
/// ```
/// use docchat_core::session::ConversationLog;
///
/// let mut log = ConversationLog::new();
/// log.append("user", "What is chapter 3 about?", None).unwrap();
/// log.append("assistant", "It covers eviction policies.", None).unwrap();
/// assert_eq!(log.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a log from previously stored messages, re-enforcing the
    /// capacity invariant on whatever was restored.
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        let mut log = Self { messages };
        log.evict_over_capacity();
        log
    }

    /// Validates and appends a message, then enforces capacity.
    ///
    /// The role arrives in its wire form because the caller sits at the
    /// UI boundary; use [`ConversationLog::append_message`] when a
    /// typed [`MessageRole`] is already in hand.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRole` for a role outside `user`/`assistant` and
    /// `InvalidContent` for empty-after-trim or oversized content. The
    /// log is not mutated on either error.
    pub fn append(
        &mut self,
        role: &str,
        content: &str,
        metadata: Option<MessageMetadata>,
    ) -> Result<ChatMessage> {
        let role = role.parse::<MessageRole>()?;
        self.append_message(role, content, metadata)
    }

    /// Typed variant of [`ConversationLog::append`].
    pub fn append_message(
        &mut self,
        role: MessageRole,
        content: &str,
        metadata: Option<MessageMetadata>,
    ) -> Result<ChatMessage> {
        let mut message = ChatMessage::new(role, content, metadata)?;

        // Timestamps never move backwards within one log.
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }

        self.messages.push(message.clone());
        self.evict_over_capacity();
        Ok(message)
    }

    /// Removes leading pairs until the log is back under capacity.
    ///
    /// Pairs are positional: the two oldest messages always leave
    /// together, so cleanup can never strand half of an exchange at the
    /// front of the log.
    fn evict_over_capacity(&mut self) {
        while self.messages.len() > MAX_MESSAGES {
            self.messages.drain(..2);
        }
    }

    /// Returns a snapshot of the log in chronological order.
    ///
    /// The caller owns the returned vector; mutating it does not affect
    /// the log.
    pub fn list(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    /// Borrows the messages in chronological order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the number of messages currently held.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true when the log holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Empties the log. Idempotent.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
