//! Error types for the DocChat history core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the DocChat history core.
///
/// Validation variants are rejected synchronously at the append boundary
/// and never reach storage. Storage variants are produced by slot
/// backends and absorbed at the persistence mirror; they surface to
/// callers only as a degraded `StorageStatus`, never as a hard failure
/// of the conversation flow.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DocChatError {
    /// Message role outside the accepted set
    #[error("invalid message role: '{role}' (expected \"user\" or \"assistant\")")]
    InvalidRole { role: String },

    /// Message content empty after trimming, or over the length limit
    #[error("invalid message content: {reason}")]
    InvalidContent { reason: String },

    /// Slot payload too large for the storage backend
    #[error("storage quota exceeded: payload is {size_bytes} bytes, limit is {limit_bytes}")]
    QuotaExceeded {
        size_bytes: usize,
        limit_bytes: usize,
    },

    /// Storage backend refused the operation entirely
    #[error("storage disabled: {0}")]
    StorageDisabled(String),

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("internal error: {0}")]
    Internal(String),
}

impl DocChatError {
    /// Creates an InvalidContent error
    pub fn invalid_content(reason: impl Into<String>) -> Self {
        Self::InvalidContent {
            reason: reason.into(),
        }
    }

    /// Creates a StorageDisabled error
    pub fn storage_disabled(message: impl Into<String>) -> Self {
        Self::StorageDisabled(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error was raised by append-time validation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRole { .. } | Self::InvalidContent { .. }
        )
    }

    /// Check if this error belongs to the storage boundary
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded { .. }
                | Self::StorageDisabled(_)
                | Self::Serialization { .. }
                | Self::Io { .. }
        )
    }
}

impl From<std::io::Error> for DocChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DocChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DocChatError>`.
pub type Result<T> = std::result::Result<T, DocChatError>;
