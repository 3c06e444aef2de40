//! Prompt-ready context extraction.
//!
//! Derives a bounded view of the recent conversation for the
//! prompt-construction layer. Extraction is read-only over the log: it
//! never appends, evicts, or persists.

use crate::session::log::ConversationLog;
use crate::session::message::MessageRole;
use crate::session::model::SessionRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Default number of recent exchanges included in a context window.
pub const DEFAULT_CONTEXT_EXCHANGES: usize = 5;

/// Maximum length of the derived conversation summary, in characters.
pub const MAX_SUMMARY_CHARS: usize = 500;

/// Words taken from the front of a question when deriving its topic.
const TOPIC_WORDS: usize = 5;

/// Topics rendered into the summary line.
const SUMMARY_TOPICS: usize = 3;

/// Topics passed through in the document context.
const DOCUMENT_TOPICS: usize = 5;

/// One user question together with the answer it received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    /// The user's question text.
    pub user_text: String,
    /// The assistant's answer text.
    pub assistant_text: String,
    /// Timestamp of the answering message.
    pub timestamp: DateTime<Utc>,
}

/// Document descriptor restricted to what prompt construction needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentContext {
    /// Name of the loaded document, if one has been processed.
    pub name: Option<String>,
    /// Pre-extracted document topics, at most five.
    pub topics: Vec<String>,
}

/// The bounded, LLM-consumable view of a session's conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationContext {
    /// The selected recent exchanges, oldest first.
    pub recent_exchanges: Vec<Exchange>,
    /// Short derived digest of the windowed questions.
    pub conversation_summary: String,
    /// Name and topics of the loaded document.
    pub document_context: DocumentContext,
    /// Length of the full log, not of the window. Display-only.
    pub total_messages: usize,
}

/// Builds the context window over a session's log.
///
/// Selects the most recent `last_n` complete exchanges (a user message
/// immediately followed by an assistant message), walking backwards
/// through the log. A trailing unanswered question is skipped rather
/// than breaking extraction.
pub fn build_context(record: &SessionRecord, last_n: usize) -> ConversationContext {
    let exchanges = recent_exchanges(&record.log, last_n);

    ConversationContext {
        conversation_summary: summarize(&exchanges),
        document_context: document_context(record),
        total_messages: record.log.len(),
        recent_exchanges: exchanges,
    }
}

fn recent_exchanges(log: &ConversationLog, last_n: usize) -> Vec<Exchange> {
    let messages = log.messages();
    let mut exchanges = Vec::new();
    let mut i = messages.len();

    while i >= 2 && exchanges.len() < last_n {
        let (question, answer) = (&messages[i - 2], &messages[i - 1]);
        if question.role == MessageRole::User && answer.role == MessageRole::Assistant {
            exchanges.push(Exchange {
                user_text: question.content.clone(),
                assistant_text: answer.content.clone(),
                timestamp: answer.timestamp,
            });
            i -= 2;
        } else {
            i -= 1;
        }
    }

    exchanges.reverse();
    exchanges
}

/// Derives the summary line from the windowed questions.
///
/// Topics are the first few words of each question, de-duplicated in
/// first-seen order, so the digest is deterministic for a given window.
fn summarize(exchanges: &[Exchange]) -> String {
    let mut topics: Vec<String> = Vec::new();
    for exchange in exchanges {
        let topic = exchange
            .user_text
            .split_whitespace()
            .take(TOPIC_WORDS)
            .collect::<Vec<_>>()
            .join(" ");
        if !topic.is_empty() && !topics.contains(&topic) {
            topics.push(topic);
        }
    }

    if topics.is_empty() {
        return String::new();
    }

    topics.truncate(SUMMARY_TOPICS);
    truncate_chars(
        &format!("Discussion about: {}", topics.join(", ")),
        MAX_SUMMARY_CHARS,
    )
}

fn document_context(record: &SessionRecord) -> DocumentContext {
    match &record.document {
        Some(document) => DocumentContext {
            name: Some(document.name.clone()),
            topics: document.topics.iter().take(DOCUMENT_TOPICS).cloned().collect(),
        },
        None => DocumentContext::default(),
    }
}

/// Truncates on character boundaries so multi-byte content cannot be
/// split mid-codepoint.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
