use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the studio's I/O and render paths.
///
/// Geometry never errors (out-of-range input is clamped), and stale async
/// completions are discarded silently; everything here aborts exactly one
/// user-visible operation and leaves the editor state intact.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Upload to {path} failed: {source}")]
    Upload {
        path: String,
        source: std::io::Error,
    },

    #[error("No usable font: {0}")]
    Font(String),

    #[error("Failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(std::io::Error),

    #[error("Draft {0} not found")]
    DraftNotFound(uuid::Uuid),

    /// Fatal to the editor view; the app shows a fallback screen instead
    /// of crashing.
    #[error("Render surface unavailable: {0}")]
    Surface(String),
}

/// Result alias used throughout the crate.
pub type StudioResult<T> = Result<T, StudioError>;
