//! In-memory slot backend.

use crate::slot::SessionSlot;
use docchat_core::{DocChatError, Result};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MemorySlotState {
    payload: Option<String>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

/// A slot held entirely in memory.
///
/// Used when no durable channel is available (the session then simply
/// does not survive a reload) and as the controllable backend in
/// tests: quota exhaustion and disabled storage can be switched on at
/// runtime to exercise the mirror's degradation paths.
///
/// Clones share the same underlying cell.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    state: Arc<Mutex<MemorySlotState>>,
}

impl MemorySlot {
    /// Creates an empty slot without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty slot that rejects payloads over `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        let slot = Self::new();
        slot.set_quota(Some(quota_bytes));
        slot
    }

    /// Sets or removes the byte quota.
    pub fn set_quota(&self, quota_bytes: Option<usize>) {
        self.state.lock().unwrap().quota_bytes = quota_bytes;
    }

    /// Switches the channel on or off entirely.
    pub fn set_disabled(&self, disabled: bool) {
        self.state.lock().unwrap().disabled = disabled;
    }

    /// Returns the current payload, for inspection in tests.
    pub fn payload(&self) -> Option<String> {
        self.state.lock().unwrap().payload.clone()
    }
}

impl SessionSlot for MemorySlot {
    fn get(&self) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if state.disabled {
            return Err(DocChatError::storage_disabled("memory slot is disabled"));
        }
        Ok(state.payload.clone())
    }

    fn put(&self, payload: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.disabled {
            return Err(DocChatError::storage_disabled("memory slot is disabled"));
        }
        if let Some(limit) = state.quota_bytes {
            if payload.len() > limit {
                return Err(DocChatError::QuotaExceeded {
                    size_bytes: payload.len(),
                    limit_bytes: limit,
                });
            }
        }
        state.payload = Some(payload.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.disabled {
            return Err(DocChatError::storage_disabled("memory slot is disabled"));
        }
        state.payload = None;
        Ok(())
    }
}
