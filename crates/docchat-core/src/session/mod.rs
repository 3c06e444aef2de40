//! Session domain module.
//!
//! This module contains the conversation-history domain: message
//! records, the bounded log, the session record, context extraction,
//! the persistence-mirror contract, and session lifecycle management.
//!
//! # Module Structure
//!
//! - `message`: message record and role (`ChatMessage`, `MessageRole`)
//! - `log`: bounded ordered message store (`ConversationLog`)
//! - `model`: session state (`SessionRecord`, `DocumentMetadata`,
//!   `StorageStatus`)
//! - `context`: prompt-ready window extraction (`build_context`)
//! - `mirror`: best-effort persistence contract (`SessionMirror`)
//! - `manager`: session lifecycle coordination (`SessionManager`)

mod context;
mod log;
mod manager;
mod message;
mod mirror;
mod model;

// Re-export public API
pub use context::{
    ConversationContext, DEFAULT_CONTEXT_EXCHANGES, DocumentContext, Exchange, MAX_SUMMARY_CHARS,
    build_context,
};
pub use log::{ConversationLog, MAX_MESSAGES};
pub use manager::{SessionManager, SessionStatus};
pub use message::{
    ChatMessage, MAX_CONTENT_CHARS, MESSAGE_ID_KEY, MessageMetadata, MessageRole,
};
pub use mirror::{MirrorLoad, SessionMirror};
pub use model::{DocumentMetadata, SessionRecord, StorageStatus};
