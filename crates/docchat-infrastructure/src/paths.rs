//! Platform path helpers for DocChat storage.
//!
//! The session slot lives under the platform data directory so it
//! survives page reloads without polluting the working directory.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform data directory could not be determined.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DataDirNotFound => write!(f, "Cannot find platform data directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for DocChat.
///
/// # Directory Structure
///
/// ```text
/// <platform data dir>/docchat/
/// └── session_slot.json        # The mirrored session slot
/// ```
pub struct DocChatPaths;

impl DocChatPaths {
    /// Returns the DocChat data directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the data directory
    ///   (e.g., `~/.local/share/docchat/`)
    /// - `Err(PathError::DataDirNotFound)`: Could not determine directory
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("docchat"))
            .ok_or(PathError::DataDirNotFound)
    }

    /// Returns the default path of the mirrored session slot.
    pub fn slot_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("session_slot.json"))
    }
}
