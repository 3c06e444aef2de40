//! JSON persistence mirror over a raw storage slot.
//!
//! Serializes the session record through the versioned slot DTO and
//! absorbs every storage failure at this boundary: corruption becomes
//! an anomaly flag, a failed save becomes `false`, and nothing is ever
//! raised to the conversation flow.

use crate::dto::{DocumentMetadataDto, SLOT_SCHEMA_VERSION, SessionSlotV1};
use crate::slot::SessionSlot;
use docchat_core::session::{
    ChatMessage, ConversationLog, MAX_MESSAGES, MirrorLoad, SessionMirror, SessionRecord,
    StorageStatus,
};
use serde_json::Value;
use tracing::{debug, warn};

/// A [`SessionMirror`] writing one JSON document to a [`SessionSlot`].
pub struct JsonSlotMirror<S: SessionSlot> {
    slot: S,
}

impl<S: SessionSlot> JsonSlotMirror<S> {
    /// Creates a mirror over the given slot backend.
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Borrows the underlying slot backend.
    pub fn slot(&self) -> &S {
        &self.slot
    }
}

impl<S: SessionSlot> SessionMirror for JsonSlotMirror<S> {
    fn load(&self) -> MirrorLoad {
        let payload = match self.slot.get() {
            Ok(Some(payload)) => payload,
            Ok(None) => return MirrorLoad::empty(),
            Err(e) => {
                warn!(error = %e, "could not read the session slot; starting fresh");
                return MirrorLoad::anomalous();
            }
        };
        restore_record(&payload)
    }

    fn save(&self, record: &SessionRecord) -> bool {
        let payload = match serde_json::to_string(&SessionSlotV1::from(record)) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "could not serialize the session record");
                return false;
            }
        };

        match self.slot.put(&payload) {
            Ok(()) => {
                debug!(bytes = payload.len(), "session slot saved");
                true
            }
            Err(e) => {
                warn!(error = %e, "could not save the session slot; continuing in memory");
                false
            }
        }
    }

    fn clear(&self) {
        if let Err(e) = self.slot.delete() {
            warn!(error = %e, "could not clear the session slot");
        }
    }
}

/// Rebuilds a session record from a slot payload, salvaging what it
/// can. Field-level damage drops the field; document-level damage (bad
/// JSON, wrong schema version, missing session id) drops everything.
/// Either way the damage is reported as an anomaly, never an error.
fn restore_record(payload: &str) -> MirrorLoad {
    let root: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "session slot holds malformed JSON; starting fresh");
            return MirrorLoad::anomalous();
        }
    };
    let Some(root) = root.as_object() else {
        warn!("session slot is not a JSON object; starting fresh");
        return MirrorLoad::anomalous();
    };

    match root.get("version").and_then(Value::as_str) {
        Some(SLOT_SCHEMA_VERSION) => {}
        other => {
            warn!(version = ?other, "unsupported session slot schema; starting fresh");
            return MirrorLoad::anomalous();
        }
    }

    let session_id = match root.get("session_id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => {
            warn!("session slot has no usable session id; starting fresh");
            return MirrorLoad::anomalous();
        }
    };

    let mut anomaly = false;

    let mut messages: Vec<ChatMessage> = Vec::new();
    match root.get("chat_history") {
        Some(Value::Array(entries)) => {
            for entry in entries {
                match serde_json::from_value::<ChatMessage>(entry.clone()) {
                    Ok(message) if message.validate().is_ok() => messages.push(message),
                    Ok(_) | Err(_) => {
                        anomaly = true;
                        debug!("dropped a malformed message while restoring history");
                    }
                }
            }
        }
        Some(_) => {
            anomaly = true;
            warn!("restored chat history is not an array; dropping it");
        }
        None => {}
    }

    // A slot that grew past capacity violated the log invariant.
    if messages.len() > MAX_MESSAGES {
        anomaly = true;
        warn!(
            restored = messages.len(),
            "restored history is over capacity; evicting oldest pairs"
        );
    }
    let log = ConversationLog::from_messages(messages);

    let document = match root.get("document_metadata") {
        None => None,
        Some(value) => match serde_json::from_value::<DocumentMetadataDto>(value.clone()) {
            Ok(dto) => dto.into_domain(),
            Err(e) => {
                anomaly = true;
                warn!(error = %e, "dropped malformed document metadata");
                None
            }
        },
    };

    let storage_status = match root.get("storage_status") {
        None => StorageStatus::default(),
        Some(value) => match serde_json::from_value::<StorageStatus>(value.clone()) {
            Ok(status) => status,
            Err(_) => {
                anomaly = true;
                StorageStatus::default()
            }
        },
    };

    let record = SessionRecord {
        session_id,
        log,
        document,
        storage_status,
        index_ready: false,
    };
    MirrorLoad {
        record: Some(record),
        anomaly,
    }
}
