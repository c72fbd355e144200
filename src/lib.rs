//! # autohd - video quality preference resolution
//!
//! This library decides which quality tier to request for a video, given the
//! user's per-frame-rate quality preferences. Preferences are keyed on a few
//! frame rates (30, 50 and 60 by default); a video is matched to the nearest
//! configured frame rate at or above its own.
//!
//! ## Features
//!
//! - Resolve a video's frame rate against configured preferences
//! - Merge persisted user preferences over built-in defaults
//! - Keep the last known preferences when storage becomes unreadable
//! - Pluggable key/value storage (in-memory or a JSON file)
//! - Parse player quality labels such as `1080p60`
//!
//! ## Quick Start
//!
//! ```rust
//! use autohd::{resolve_fps, default_qualities, VideoFps};
//!
//! let prefs = default_qualities();
//! assert_eq!(resolve_fps(&prefs, VideoFps::new(24)?)?.get(), 30);
//! assert_eq!(resolve_fps(&prefs, VideoFps::new(48)?)?.get(), 50);
//! assert_eq!(resolve_fps(&prefs, VideoFps::new(120)?)?.get(), 60);
//! # Ok::<(), autohd::Error>(())
//! ```
//!
//! ### Persisted Preferences
//!
//! ```rust,no_run
//! use autohd::{JsonFileStore, PreferenceCache, VideoFps};
//!
//! let store = JsonFileStore::new("/tmp/autohd/storage.json");
//! let mut cache = PreferenceCache::new();
//! cache.refresh(&store);
//!
//! let (fps, quality) = cache.resolve(VideoFps::new(60)?)?;
//! println!("{} fps videos play at {}", fps, quality);
//! # Ok::<(), autohd::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible functions return [`Result<T, Error>`]. Resolving against an
//! empty mapping is reported as [`Error::EmptyPreferences`]:
//!
//! ```rust
//! use autohd::{resolve_fps, Error, VideoFps, VideoQuality};
//! use std::collections::HashMap;
//!
//! let empty: HashMap<VideoFps, VideoQuality> = HashMap::new();
//! match resolve_fps(&empty, VideoFps::new(30)?) {
//!     Err(Error::EmptyPreferences) => println!("nothing configured"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! # Ok::<(), autohd::Error>(())
//! ```

// Re-export all public types at crate root
pub use types::{
    default_qualities, QualityFpsPreferences, VideoFps, VideoQuality, YouTubeLabel,
    SUPPORTED_FPS,
};

// Re-export error types
pub use error::{Error, Result};

pub use fps::{preferred_quality_for, resolve_fps};
pub use preferences::{decode_qualities, encode_qualities, PreferenceCache, QUALITIES_KEY};
pub use quality::quality_index;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StorageArea};

// All modules are private - use re-exports above for public API
mod error;
mod fps;
mod preferences;
mod quality;
mod store;
mod types;
