//! Session lifecycle management.
//!
//! `SessionManager` owns one session's record and coordinates the
//! conversation log, the context extractor, and the persistence mirror
//! across the request/response cycle.

use crate::error::Result;
use crate::session::context::{ConversationContext, build_context};
use crate::session::log::ConversationLog;
use crate::session::message::{ChatMessage, MessageMetadata, MessageRole};
use crate::session::mirror::SessionMirror;
use crate::session::model::{DocumentMetadata, SessionRecord, StorageStatus};
use serde::Serialize;

/// Display-oriented summary of a session's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    /// The session's opaque token.
    pub session_id: String,
    /// Outcome of the most recent persistence attempt.
    pub storage_status: StorageStatus,
    /// Number of messages in the full log.
    pub message_count: usize,
    /// Whether a document has been processed for this session.
    pub document_loaded: bool,
    /// Whether the in-memory vector index is ready for retrieval.
    pub index_ready: bool,
}

/// Owns one session's record and its persistence mirror.
///
/// Each user turn runs through the manager synchronously: append the
/// question, hand [`SessionManager::conversation_context`] to the
/// prompt-construction layer, append the answer it produced. Every
/// append triggers a fire-and-forget mirror save whose outcome only
/// moves [`StorageStatus`]; a failed save never rolls an append back.
///
/// # Examples
///
/// ```ignore
/// use docchat_core::session::SessionManager;
/// use docchat_infrastructure::{FileSlot, JsonSlotMirror};
///
/// let mirror = JsonSlotMirror::new(FileSlot::default_location()?);
/// let mut session = SessionManager::start(Box::new(mirror));
/// session.append_user("What does chapter 2 say about eviction?")?;
/// ```
pub struct SessionManager {
    record: SessionRecord,
    mirror: Box<dyn SessionMirror>,
}

impl SessionManager {
    /// Starts a session, seeding it from the mirror when the external
    /// slot holds a usable record from a previous page load.
    ///
    /// A restored record keeps its session id; otherwise a fresh one is
    /// generated. The load outcome sets the initial storage status.
    pub fn start(mirror: Box<dyn SessionMirror>) -> Self {
        let loaded = mirror.load();
        let anomaly = loaded.anomaly;

        let mut record = loaded.record.unwrap_or_else(SessionRecord::new);
        record.storage_status = record.storage_status.after_load(anomaly);
        // The vector index lives in memory and does not survive a reload.
        record.index_ready = false;

        Self { record, mirror }
    }

    /// Validates and appends a message, then mirrors the session.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRole` or `InvalidContent` without mutating the
    /// log. Persistence failures are not errors: they only degrade
    /// [`SessionManager::storage_status`].
    pub fn append(
        &mut self,
        role: &str,
        content: &str,
        metadata: Option<MessageMetadata>,
    ) -> Result<ChatMessage> {
        let message = self.record.log.append(role, content, metadata)?;
        self.persist();
        Ok(message)
    }

    /// Appends a user question.
    pub fn append_user(&mut self, content: &str) -> Result<ChatMessage> {
        self.append_typed(MessageRole::User, content, None)
    }

    /// Appends an assistant answer.
    pub fn append_assistant(&mut self, content: &str) -> Result<ChatMessage> {
        self.append_typed(MessageRole::Assistant, content, None)
    }

    fn append_typed(
        &mut self,
        role: MessageRole,
        content: &str,
        metadata: Option<MessageMetadata>,
    ) -> Result<ChatMessage> {
        let message = self.record.log.append_message(role, content, metadata)?;
        self.persist();
        Ok(message)
    }

    /// Returns a snapshot of the conversation in chronological order.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.record.log.list()
    }

    /// Returns the number of messages in the current session.
    pub fn message_count(&self) -> usize {
        self.record.log.len()
    }

    /// Empties the conversation and removes the external slot.
    /// Idempotent; used for the manual clear action.
    pub fn clear_history(&mut self) {
        self.record.log.clear();
        self.mirror.clear();
    }

    /// Replaces the session's document context.
    ///
    /// The previous conversation and its external slot are dropped so
    /// stale history cannot be reloaded against the new document, then
    /// the fresh state is mirrored.
    pub fn begin_document(&mut self, document: DocumentMetadata) {
        self.record.log.clear();
        self.mirror.clear();
        self.record.document = Some(document);
        self.record.index_ready = false;
        self.persist();
    }

    /// Marks the vector index as ready for retrieval.
    pub fn mark_index_ready(&mut self) {
        self.record.index_ready = true;
    }

    /// Builds the bounded context window handed to prompt construction.
    pub fn conversation_context(&self, last_n: usize) -> ConversationContext {
        build_context(&self.record, last_n)
    }

    /// Returns the display-oriented session summary.
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.record.session_id.clone(),
            storage_status: self.record.storage_status,
            message_count: self.record.log.len(),
            document_loaded: self.record.document.is_some(),
            index_ready: self.record.index_ready,
        }
    }

    /// Returns the session's opaque token.
    pub fn session_id(&self) -> &str {
        &self.record.session_id
    }

    /// Returns the outcome of the most recent persistence attempt.
    pub fn storage_status(&self) -> StorageStatus {
        self.record.storage_status
    }

    /// Borrows the currently loaded document descriptor.
    pub fn document(&self) -> Option<&DocumentMetadata> {
        self.record.document.as_ref()
    }

    /// Borrows the session record.
    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    /// Borrows the conversation log.
    pub fn log(&self) -> &ConversationLog {
        &self.record.log
    }

    /// Mirrors the record and folds the outcome into the status.
    fn persist(&mut self) {
        let saved = self.mirror.save(&self.record);
        self.record.storage_status = self.record.storage_status.after_save(saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::mirror::MirrorLoad;
    use std::sync::{Arc, Mutex};

    /// Mirror double backed by shared memory, with switchable failure.
    #[derive(Default)]
    struct MockMirrorState {
        stored: Option<SessionRecord>,
        fail_saves: bool,
        anomalous_load: bool,
        save_calls: usize,
        clear_calls: usize,
    }

    #[derive(Clone, Default)]
    struct MockMirror {
        state: Arc<Mutex<MockMirrorState>>,
    }

    impl MockMirror {
        fn new() -> Self {
            Self::default()
        }

        fn set_fail_saves(&self, fail: bool) {
            self.state.lock().unwrap().fail_saves = fail;
        }

        fn set_anomalous_load(&self, anomalous: bool) {
            self.state.lock().unwrap().anomalous_load = anomalous;
        }

        fn stored(&self) -> Option<SessionRecord> {
            self.state.lock().unwrap().stored.clone()
        }

        fn save_calls(&self) -> usize {
            self.state.lock().unwrap().save_calls
        }

        fn clear_calls(&self) -> usize {
            self.state.lock().unwrap().clear_calls
        }
    }

    impl SessionMirror for MockMirror {
        fn load(&self) -> MirrorLoad {
            let state = self.state.lock().unwrap();
            if state.anomalous_load {
                return MirrorLoad::anomalous();
            }
            MirrorLoad {
                record: state.stored.clone(),
                anomaly: false,
            }
        }

        fn save(&self, record: &SessionRecord) -> bool {
            let mut state = self.state.lock().unwrap();
            state.save_calls += 1;
            if state.fail_saves {
                return false;
            }
            state.stored = Some(record.clone());
            true
        }

        fn clear(&self) {
            let mut state = self.state.lock().unwrap();
            state.clear_calls += 1;
            state.stored = None;
        }
    }

    fn start_session(mirror: &MockMirror) -> SessionManager {
        SessionManager::start(Box::new(mirror.clone()))
    }

    #[test]
    fn fresh_session_starts_empty_and_active() {
        let mirror = MockMirror::new();
        let session = start_session(&mirror);

        assert!(session.history().is_empty());
        assert_eq!(session.storage_status(), StorageStatus::Active);
        assert!(session.session_id().starts_with("session_"));
    }

    #[test]
    fn appends_mirror_the_record() {
        let mirror = MockMirror::new();
        let mut session = start_session(&mirror);

        session.append_user("what is this about?").unwrap();
        session.append_assistant("a bounded history store").unwrap();

        assert_eq!(mirror.save_calls(), 2);
        let stored = mirror.stored().unwrap();
        assert_eq!(stored.log.len(), 2);
        assert_eq!(stored.session_id, session.session_id());
    }

    #[test]
    fn restored_session_keeps_its_identity_and_history() {
        let mirror = MockMirror::new();
        {
            let mut session = start_session(&mirror);
            session.append_user("question").unwrap();
            session.append_assistant("answer").unwrap();
        }

        let first_id = mirror.stored().unwrap().session_id.clone();
        let session = start_session(&mirror);

        assert_eq!(session.session_id(), first_id);
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.storage_status(), StorageStatus::Active);
        assert!(!session.status().index_ready);
    }

    #[test]
    fn save_failures_degrade_then_sink_to_unavailable() {
        let mirror = MockMirror::new();
        let mut session = start_session(&mirror);
        mirror.set_fail_saves(true);

        session.append_user("first try").unwrap();
        assert_eq!(session.storage_status(), StorageStatus::Degraded);

        session.append_assistant("still answering").unwrap();
        assert_eq!(session.storage_status(), StorageStatus::Unavailable);

        // The conversation itself kept working in memory.
        assert_eq!(session.message_count(), 2);
    }

    #[test]
    fn successful_save_recovers_from_unavailable() {
        let mirror = MockMirror::new();
        let mut session = start_session(&mirror);
        mirror.set_fail_saves(true);
        session.append_user("one").unwrap();
        session.append_user("two").unwrap();
        assert_eq!(session.storage_status(), StorageStatus::Unavailable);

        mirror.set_fail_saves(false);
        session.append_assistant("back").unwrap();
        assert_eq!(session.storage_status(), StorageStatus::Active);
    }

    #[test]
    fn anomalous_load_starts_fresh_and_degraded() {
        let mirror = MockMirror::new();
        mirror.set_anomalous_load(true);

        let session = start_session(&mirror);
        assert!(session.history().is_empty());
        assert_eq!(session.storage_status(), StorageStatus::Degraded);
    }

    #[test]
    fn invalid_appends_are_rejected_without_persisting() {
        let mirror = MockMirror::new();
        let mut session = start_session(&mirror);

        assert!(session.append("narrator", "hi", None).is_err());
        assert!(session.append("user", "   ", None).is_err());

        assert_eq!(session.message_count(), 0);
        assert_eq!(mirror.save_calls(), 0);
    }

    #[test]
    fn clear_history_empties_log_and_slot_idempotently() {
        let mirror = MockMirror::new();
        let mut session = start_session(&mirror);
        session.append_user("to be forgotten").unwrap();

        session.clear_history();
        assert!(session.history().is_empty());
        assert!(mirror.stored().is_none());

        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(mirror.clear_calls(), 2);
    }

    #[test]
    fn begin_document_resets_conversation_state() {
        let mirror = MockMirror::new();
        let mut session = start_session(&mirror);
        session.append_user("about the old document").unwrap();
        session.append_assistant("old answer").unwrap();
        session.mark_index_ready();

        session.begin_document(DocumentMetadata::new("fresh.pdf"));

        assert!(session.history().is_empty());
        let status = session.status();
        assert!(status.document_loaded);
        assert!(!status.index_ready);
        assert_eq!(session.document().unwrap().name, "fresh.pdf");
        // The mirrored slot now holds the fresh state, not stale history.
        let stored = mirror.stored().unwrap();
        assert!(stored.log.is_empty());
        assert_eq!(stored.document.as_ref().unwrap().name, "fresh.pdf");
    }

    #[test]
    fn status_reports_the_full_picture() {
        let mirror = MockMirror::new();
        let mut session = start_session(&mirror);
        session.append_user("q").unwrap();
        session.append_assistant("a").unwrap();
        session.begin_document(DocumentMetadata::new("doc.pdf"));
        session.append_user("about the new doc").unwrap();

        let status = session.status();
        assert_eq!(status.message_count, 1);
        assert!(status.document_loaded);
        assert_eq!(status.storage_status, StorageStatus::Active);
        assert_eq!(status.session_id, session.session_id());
    }

    #[test]
    fn context_window_flows_through_the_manager() {
        let mirror = MockMirror::new();
        let mut session = start_session(&mirror);
        for i in 0..7 {
            session.append_user(&format!("question {}", i)).unwrap();
            session.append_assistant(&format!("answer {}", i)).unwrap();
        }

        let context = session.conversation_context(5);
        assert_eq!(context.recent_exchanges.len(), 5);
        assert_eq!(context.total_messages, 14);
        assert_eq!(context.recent_exchanges[0].user_text, "question 2");
    }
}
