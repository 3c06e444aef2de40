//! Conversation message types.
//!
//! This module contains the fixed-shape message record and its role
//! enum. Messages are validated once, at construction; a message that
//! exists is always well-formed.

use crate::error::{DocChatError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum message content length, in characters, counted after trimming.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// Metadata key under which a generated message id is stored.
pub const MESSAGE_ID_KEY: &str = "message_id";

/// Open string-keyed metadata attached to a message.
pub type MessageMetadata = Map<String, Value>;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

impl MessageRole {
    /// Returns the lowercase wire form of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl FromStr for MessageRole {
    type Err = DocChatError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(DocChatError::InvalidRole {
                role: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a conversation history.
///
/// Each message has a role, trimmed content, a creation timestamp, and
/// an open metadata mapping. A `message_id` UUID is assigned inside the
/// metadata at construction when the caller did not provide one.
///
/// Messages are never mutated after creation; they leave the log only
/// through eviction or a full clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The message text, trimmed of surrounding whitespace.
    pub content: String,
    /// Timestamp when the message was created.
    pub timestamp: DateTime<Utc>,
    /// Open metadata mapping (message id, source document name, ...).
    #[serde(default)]
    pub metadata: MessageMetadata,
}

impl ChatMessage {
    /// Creates a new validated message stamped with the current instant.
    ///
    /// # Errors
    ///
    /// Returns `InvalidContent` if the content is empty after trimming
    /// or longer than [`MAX_CONTENT_CHARS`] characters.
    pub fn new(
        role: MessageRole,
        content: &str,
        metadata: Option<MessageMetadata>,
    ) -> Result<Self> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DocChatError::invalid_content(
                "content is empty after trimming",
            ));
        }
        let chars = content.chars().count();
        if chars > MAX_CONTENT_CHARS {
            return Err(DocChatError::invalid_content(format!(
                "content is {} characters, limit is {}",
                chars, MAX_CONTENT_CHARS
            )));
        }

        let mut metadata = metadata.unwrap_or_default();
        metadata
            .entry(MESSAGE_ID_KEY.to_string())
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));

        Ok(Self {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
            metadata,
        })
    }

    /// Returns the generated (or caller-supplied) message id, if any.
    pub fn message_id(&self) -> Option<&str> {
        self.metadata.get(MESSAGE_ID_KEY).and_then(Value::as_str)
    }

    /// Re-checks the content invariants on a message that bypassed
    /// [`ChatMessage::new`], e.g. one deserialized from external storage.
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(DocChatError::invalid_content(
                "content is empty after trimming",
            ));
        }
        let chars = self.content.chars().count();
        if chars > MAX_CONTENT_CHARS {
            return Err(DocChatError::invalid_content(format!(
                "content is {} characters, limit is {}",
                chars, MAX_CONTENT_CHARS
            )));
        }
        Ok(())
    }
}
