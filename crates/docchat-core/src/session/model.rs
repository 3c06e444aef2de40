//! Session domain model.
//!
//! This module contains the session record owned by one browser-tab
//! lifetime, the descriptor of the currently loaded document, and the
//! storage availability state machine.

use crate::session::log::ConversationLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Availability of the external persistence channel.
///
/// The value reflects the outcome of the most recent save or load
/// attempt only; there is no background probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageStatus {
    /// Last persistence attempt succeeded.
    #[default]
    Active,
    /// An anomaly was swallowed but the channel still responds.
    Degraded,
    /// The channel consistently fails (e.g. quota persistently exceeded).
    Unavailable,
}

impl StorageStatus {
    /// Returns the lowercase wire form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageStatus::Active => "active",
            StorageStatus::Degraded => "degraded",
            StorageStatus::Unavailable => "unavailable",
        }
    }

    /// Advances the state machine after a save attempt.
    ///
    /// Any success restores `Active`. A first failure out of `Active`
    /// lands on `Degraded`; failing again sinks to `Unavailable`.
    pub fn after_save(self, saved: bool) -> Self {
        if saved {
            StorageStatus::Active
        } else {
            match self {
                StorageStatus::Active => StorageStatus::Degraded,
                StorageStatus::Degraded | StorageStatus::Unavailable => {
                    StorageStatus::Unavailable
                }
            }
        }
    }

    /// Advances the state machine after a load attempt.
    ///
    /// A swallowed parse anomaly marks the channel `Degraded`; a clean
    /// read (including an empty slot) marks it `Active`.
    pub fn after_load(self, anomaly: bool) -> Self {
        if anomaly {
            StorageStatus::Degraded
        } else {
            StorageStatus::Active
        }
    }
}

impl fmt::Display for StorageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor of the document currently backing the session's Q&A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Display name of the source document.
    pub name: String,
    /// Size of the uploaded file, when known.
    pub size_bytes: Option<u64>,
    /// Page count reported by the extraction step, when known.
    pub pages: Option<u32>,
    /// Instant at which processing of the document finished.
    pub processed_at: DateTime<Utc>,
    /// Topics pre-extracted by the indexing pipeline. Runtime-only:
    /// the persisted slot schema does not carry them.
    #[serde(default)]
    pub topics: Vec<String>,
}

impl DocumentMetadata {
    /// Creates a descriptor for a document processed just now.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes: None,
            pages: None,
            processed_at: Utc::now(),
            topics: Vec::new(),
        }
    }
}

/// One browser-session's full state.
///
/// The record is created at session start, either fresh or seeded from
/// the persistence mirror, and is discarded when the session ends.
/// Loading a new document wholly replaces the conversation log and the
/// document descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque session token, generated once and stable for the
    /// session's lifetime.
    pub session_id: String,
    /// The session's conversation log.
    pub log: ConversationLog,
    /// Currently loaded document, if one has been processed.
    pub document: Option<DocumentMetadata>,
    /// Outcome of the most recent persistence attempt.
    pub storage_status: StorageStatus,
    /// Whether the in-memory vector index is ready for retrieval.
    /// Always false after a restore: the index dies with the page.
    #[serde(skip)]
    pub index_ready: bool,
}

impl SessionRecord {
    /// Creates a fresh record with a newly generated session id.
    pub fn new() -> Self {
        Self {
            session_id: Self::generate_session_id(),
            log: ConversationLog::new(),
            document: None,
            storage_status: StorageStatus::Active,
            index_ready: false,
        }
    }

    /// Generates a session token of the form
    /// `session_<UTC timestamp>_<8 hex chars>`.
    fn generate_session_id() -> String {
        let timestamp = Utc::now().format("%Y%m%d%H%M%S");
        let suffix = Uuid::new_v4().simple().to_string();
        format!("session_{}_{}", timestamp, &suffix[..8])
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}
