//! DocChat core domain.
//!
//! Session-scoped conversation history for a document Q&A application:
//! a bounded message store with pair-preserving cleanup, a context
//! extractor for prompt construction, and the persistence-mirror
//! contract that keeps a conversation alive across page reloads.
//!
//! This crate is pure domain logic with no I/O; storage backends live
//! in `docchat-infrastructure`.

pub mod error;
pub mod session;

// Re-export common error type
pub use error::{DocChatError, Result};
