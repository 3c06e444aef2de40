//! Persistence mirror trait.
//!
//! Defines the best-effort external durability contract for a session
//! record. The mirror exists so a page reload within the same browser
//! session can pick the conversation back up; it is not a durable
//! store, and no failure of the mirror may interrupt the conversation.

use crate::session::model::SessionRecord;

/// Result of asking the mirror for whatever the external slot holds.
#[derive(Debug, Clone, Default)]
pub struct MirrorLoad {
    /// The restored record, if the slot held a usable one.
    pub record: Option<SessionRecord>,
    /// True when malformed, type-mismatched, or invariant-violating
    /// data was encountered and swallowed during the read.
    pub anomaly: bool,
}

impl MirrorLoad {
    /// A load that found nothing and swallowed nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A load that found nothing usable and had to discard data.
    pub fn anomalous() -> Self {
        Self {
            record: None,
            anomaly: true,
        }
    }
}

/// An abstract mirror of one session's record in external storage.
///
/// Implementations decouple the session core from the concrete storage
/// channel (a browser storage slot, a file, a remote cache). All three
/// operations absorb their own failures: `load` reports corruption
/// through [`MirrorLoad::anomaly`] instead of an error, `save` reports
/// failure as `false`, and `clear` is fire-and-forget. Nothing raised
/// by a backend escapes this boundary.
pub trait SessionMirror: Send + Sync {
    /// Reads the external slot.
    ///
    /// Missing data yields an empty load; malformed or type-mismatched
    /// data yields whatever could be salvaged plus the anomaly flag.
    fn load(&self) -> MirrorLoad;

    /// Writes the record to the external slot.
    ///
    /// Returns `false` on any failure (quota exceeded, storage
    /// disabled, serialization trouble). The caller keeps operating in
    /// memory either way.
    fn save(&self, record: &SessionRecord) -> bool;

    /// Removes the external slot so stale history cannot be reloaded
    /// later and merged into a fresh conversation.
    fn clear(&self);
}
