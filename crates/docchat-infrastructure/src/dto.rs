//! DTOs for the persisted session slot.
//!
//! `SessionSlotV1` is what is actually written to and read from the
//! external slot. The schema is versioned so a future layout change is
//! detected instead of silently misread, and it is independent of the
//! in-memory domain model.

use chrono::{DateTime, Utc};
use docchat_core::session::{ChatMessage, DocumentMetadata, SessionRecord, StorageStatus};
use serde::{Deserialize, Serialize};

/// Schema version written into every slot payload.
pub const SLOT_SCHEMA_VERSION: &str = "1.0";

/// Document descriptor as persisted.
///
/// Every field is optional so a session without a document serializes
/// as `{}`. The runtime-only topic list is intentionally absent: it is
/// rebuilt by the indexing pipeline, not restored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadataDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl DocumentMetadataDto {
    /// Converts the DTO back into the domain descriptor.
    ///
    /// A DTO without a name restores no document at all.
    pub fn into_domain(self) -> Option<DocumentMetadata> {
        let name = self.name?;
        Some(DocumentMetadata {
            name,
            size_bytes: self.size_bytes,
            pages: self.pages,
            processed_at: self.processed_at.unwrap_or_else(Utc::now),
            topics: Vec::new(),
        })
    }
}

impl From<&DocumentMetadata> for DocumentMetadataDto {
    fn from(document: &DocumentMetadata) -> Self {
        Self {
            name: Some(document.name.clone()),
            size_bytes: document.size_bytes,
            pages: document.pages,
            processed_at: Some(document.processed_at),
        }
    }
}

/// Represents V1 of the slot schema for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSlotV1 {
    /// The schema version of this data structure.
    pub version: String,
    /// Unique session identifier.
    pub session_id: String,
    /// Instant of the save that produced this payload.
    pub last_updated: DateTime<Utc>,
    /// The conversation, oldest message first.
    pub chat_history: Vec<ChatMessage>,
    /// Currently loaded document, `{}` when none.
    #[serde(default)]
    pub document_metadata: DocumentMetadataDto,
    /// Storage availability at save time.
    #[serde(default)]
    pub storage_status: StorageStatus,
}

/// Convert the domain record into the V1 DTO for persistence.
impl From<&SessionRecord> for SessionSlotV1 {
    fn from(record: &SessionRecord) -> Self {
        Self {
            version: SLOT_SCHEMA_VERSION.to_string(),
            session_id: record.session_id.clone(),
            last_updated: Utc::now(),
            chat_history: record.log.list(),
            document_metadata: record
                .document
                .as_ref()
                .map(DocumentMetadataDto::from)
                .unwrap_or_default(),
            storage_status: record.storage_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_document_serializes_as_an_empty_object() {
        let json = serde_json::to_value(DocumentMetadataDto::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn dto_without_a_name_restores_no_document() {
        let dto = DocumentMetadataDto {
            size_bytes: Some(10),
            ..Default::default()
        };
        assert!(dto.into_domain().is_none());
    }

    #[test]
    fn document_round_trips_through_the_dto() {
        let mut document = DocumentMetadata::new("handbook.pdf");
        document.size_bytes = Some(2_048);
        document.pages = Some(12);

        let dto = DocumentMetadataDto::from(&document);
        let restored = dto.into_domain().unwrap();

        assert_eq!(restored.name, document.name);
        assert_eq!(restored.size_bytes, document.size_bytes);
        assert_eq!(restored.pages, document.pages);
        assert_eq!(restored.processed_at, document.processed_at);
        assert!(restored.topics.is_empty());
    }

    #[test]
    fn slot_payload_carries_the_schema_version() {
        let record = SessionRecord::new();
        let slot = SessionSlotV1::from(&record);
        let json = serde_json::to_value(&slot).unwrap();

        assert_eq!(json["version"], SLOT_SCHEMA_VERSION);
        assert_eq!(json["session_id"], record.session_id);
        assert_eq!(json["storage_status"], "active");
        assert!(json["chat_history"].as_array().unwrap().is_empty());
        assert_eq!(json["document_metadata"], serde_json::json!({}));
    }
}
