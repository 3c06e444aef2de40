//! Raw storage slot abstraction.

use docchat_core::Result;

/// A single external key-value slot holding one serialized session.
///
/// This is the narrow seam between the persistence mirror and whatever
/// channel actually stores the payload (a file, an in-memory cell, a
/// remote cache). Backends report their failures as typed errors so
/// the mirror can classify them; they do not absorb anything
/// themselves.
pub trait SessionSlot: Send + Sync {
    /// Reads the slot payload.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(payload))`: The slot holds data
    /// - `Ok(None)`: The slot is empty
    /// - `Err(_)`: The channel failed to respond
    fn get(&self) -> Result<Option<String>>;

    /// Writes the slot payload, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns `QuotaExceeded` when the payload is over the backend's
    /// byte limit and `StorageDisabled` when the channel refuses to
    /// operate. The previous content is left intact on error.
    fn put(&self, payload: &str) -> Result<()>;

    /// Removes the slot. Removing an empty slot is not an error.
    fn delete(&self) -> Result<()>;
}
