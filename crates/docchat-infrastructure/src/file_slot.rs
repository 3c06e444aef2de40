//! File-backed slot backend.

use crate::paths::DocChatPaths;
use crate::slot::SessionSlot;
use anyhow::Context;
use docchat_core::{DocChatError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Hard byte limit for the slot payload, mirroring the quota a browser
/// storage area would impose.
pub const DEFAULT_QUOTA_BYTES: usize = 500 * 1024;

/// Payloads over this size are worth a warning before they ever hit
/// the hard limit.
pub const QUOTA_WARN_BYTES: usize = 50 * 1024;

/// A slot stored as one JSON document on disk.
pub struct FileSlot {
    path: PathBuf,
    quota_bytes: usize,
}

impl FileSlot {
    /// Creates a file slot at `path` with the default quota.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::with_quota(path, DEFAULT_QUOTA_BYTES)
    }

    /// Creates a file slot with an explicit byte quota.
    pub fn with_quota(path: impl AsRef<Path>, quota_bytes: usize) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create slot directory: {}", parent.display())
            })?;
        }

        Ok(Self { path, quota_bytes })
    }

    /// Creates a file slot at the default platform location
    /// (e.g. `~/.local/share/docchat/session_slot.json`).
    pub fn default_location() -> anyhow::Result<Self> {
        let path = DocChatPaths::slot_file().context("Failed to resolve slot location")?;
        Self::new(path)
    }

    /// Returns the path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSlot for FileSlot {
    fn get(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let payload = fs::read_to_string(&self.path)?;
        Ok(Some(payload))
    }

    fn put(&self, payload: &str) -> Result<()> {
        let size_bytes = payload.len();
        if size_bytes > self.quota_bytes {
            return Err(DocChatError::QuotaExceeded {
                size_bytes,
                limit_bytes: self.quota_bytes,
            });
        }
        if size_bytes > QUOTA_WARN_BYTES {
            tracing::warn!(
                size_bytes,
                quota_bytes = self.quota_bytes,
                "session slot is getting large; consider clearing old history"
            );
        }

        fs::write(&self.path, payload)?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn slot_in(dir: &TempDir) -> FileSlot {
        FileSlot::new(dir.path().join("session_slot.json")).unwrap()
    }

    #[test]
    fn put_get_delete_round_trip() {
        let dir = TempDir::new().unwrap();
        let slot = slot_in(&dir);

        assert_eq!(slot.get().unwrap(), None);
        slot.put("{\"version\":\"1.0\"}").unwrap();
        assert_eq!(
            slot.get().unwrap().as_deref(),
            Some("{\"version\":\"1.0\"}")
        );

        slot.delete().unwrap();
        assert_eq!(slot.get().unwrap(), None);
        slot.delete().unwrap();
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b").join("slot.json");
        let slot = FileSlot::new(&nested).unwrap();
        slot.put("x").unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn quota_rejects_oversized_payload_and_keeps_old_content() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::with_quota(dir.path().join("slot.json"), 16).unwrap();

        slot.put("fits").unwrap();
        let err = slot.put(&"y".repeat(17)).unwrap_err();
        assert!(matches!(err, DocChatError::QuotaExceeded { .. }));
        assert_eq!(slot.get().unwrap().as_deref(), Some("fits"));
    }
}
