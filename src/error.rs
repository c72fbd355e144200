//! Error types for preference resolution and storage
//!
//! All public functions return [`Result<T, Error>`] for consistent error handling.

use std::path::PathBuf;

/// Errors that can occur while resolving or persisting quality preferences
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The frame-rate mapping had no entries to resolve against
    #[error("No frame-rate preferences configured")]
    EmptyPreferences,

    /// Frame rate outside the accepted range
    #[error("Invalid frame rate: {0}")]
    InvalidFps(String),

    /// Unknown quality tier
    #[error("Invalid quality: {0}")]
    InvalidQuality(String),

    /// Player label that could not be parsed into a quality tier
    #[error("Invalid quality label: '{0}'")]
    InvalidLabel(String),

    /// Store content is unusable
    #[error("Storage error in {path}: {message}")]
    Storage { path: PathBuf, message: String },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience
///
/// # Example
///
/// ```rust
/// use autohd::{resolve_fps, QualityFpsPreferences, Result, VideoFps};
///
/// fn resolve_for_60(prefs: &QualityFpsPreferences) -> Result<VideoFps> {
///     resolve_fps(prefs, VideoFps::new(60)?)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
