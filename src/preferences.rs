//! Preference cache
//!
//! The user's per-frame-rate quality preferences are persisted under the
//! `qualities` key of the local storage area, as an object of frame-rate
//! strings to quality heights. Whatever is stored is merged over the
//! built-in defaults, so the merged mapping is never empty.
//!
//! Stored entries that cannot be decoded are skipped one by one, so a single
//! bad value never hides the user's other preferences.
//!
//! [`PreferenceCache`] keeps the last successfully loaded mapping. When the
//! store becomes unreadable (for example the backing file is corrupted) the
//! cache keeps answering with what it last saw instead of failing the
//! caller. Writes repair unreadable preferences rather than fail on them.

use crate::error::{Error, Result};
use crate::fps::preferred_quality_for;
use crate::store::{KeyValueStore, StorageArea};
use crate::types::{default_qualities, QualityFpsPreferences, VideoFps, VideoQuality};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Storage key holding the user's quality preferences
pub const QUALITIES_KEY: &str = "qualities";

/// Explicitly owned last-known quality preferences
///
/// # Example
///
/// ```rust
/// use autohd::{MemoryStore, PreferenceCache, VideoFps, VideoQuality};
///
/// let mut store = MemoryStore::new();
/// let mut cache = PreferenceCache::new();
///
/// cache.save_preference(&mut store, VideoFps::new(60)?, VideoQuality::P720)?;
/// let (fps, quality) = cache.resolve(VideoFps::new(59)?)?;
/// assert_eq!(fps.get(), 60);
/// assert_eq!(quality, VideoQuality::P720);
/// # Ok::<(), autohd::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PreferenceCache {
    last_known: QualityFpsPreferences,
}

impl Default for PreferenceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceCache {
    /// Start from the built-in defaults
    pub fn new() -> Self {
        Self {
            last_known: default_qualities(),
        }
    }

    /// Preferences as of the last successful refresh
    pub fn current(&self) -> &QualityFpsPreferences {
        &self.last_known
    }

    /// Reload preferences from `store`
    ///
    /// Stored entries override the defaults for the same frame rate; frame
    /// rates only present in the store are added. If the store cannot be
    /// read or the stored value is not an object, a warning is logged and
    /// the last known preferences are returned unchanged.
    pub fn refresh<S: KeyValueStore + ?Sized>(&mut self, store: &S) -> &QualityFpsPreferences {
        match load_user_qualities(store) {
            Ok(user_qualities) => {
                debug!("Loaded {} user quality preferences", user_qualities.len());
                let mut merged = default_qualities();
                merged.extend(user_qualities);
                self.last_known = merged;
            }
            Err(e) => {
                warn!("Failed to load quality preferences, keeping last known: {}", e);
            }
        }
        &self.last_known
    }

    /// Persist the preferred quality for one frame rate and refresh
    ///
    /// Other decodable stored entries are preserved. Stored preferences that
    /// cannot be read at all are overwritten.
    pub fn save_preference<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        fps: VideoFps,
        quality: VideoQuality,
    ) -> Result<&QualityFpsPreferences> {
        let mut user_qualities = match load_user_qualities(&*store) {
            Ok(user_qualities) => user_qualities,
            Err(e @ (Error::Storage { .. } | Error::InvalidQuality(_))) => {
                warn!("Overwriting unreadable quality preferences: {}", e);
                QualityFpsPreferences::new()
            }
            Err(e) => return Err(e),
        };
        user_qualities.insert(fps, quality);
        store.set(
            StorageArea::Local,
            QUALITIES_KEY,
            encode_qualities(&user_qualities),
        )?;
        debug!("Saved {} preference for {} fps", quality, fps);
        Ok(self.refresh(&*store))
    }

    /// Drop every stored preference and fall back to the defaults
    pub fn reset<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<&QualityFpsPreferences> {
        store.remove(StorageArea::Local, QUALITIES_KEY)?;
        self.last_known = default_qualities();
        Ok(&self.last_known)
    }

    /// Resolve a video's frame rate against the cached preferences
    pub fn resolve(&self, fps_to_check: VideoFps) -> Result<(VideoFps, VideoQuality)> {
        preferred_quality_for(&self.last_known, fps_to_check)
    }
}

/// Read only what the user has stored, without defaults
fn load_user_qualities<S: KeyValueStore + ?Sized>(store: &S) -> Result<QualityFpsPreferences> {
    match store.get(StorageArea::Local, QUALITIES_KEY)? {
        None | Some(Value::Null) => Ok(QualityFpsPreferences::new()),
        Some(value) => decode_qualities(&value),
    }
}

/// Decode `{"60": 1080, ...}` into typed preferences
///
/// Quality values may be numbers or numeric strings (`1080` or `"1080p"`).
/// Entries that do not decode are logged and skipped; only a value that is
/// not an object at all is an error.
pub fn decode_qualities(value: &Value) -> Result<QualityFpsPreferences> {
    let object = value.as_object().ok_or_else(|| {
        Error::InvalidQuality(format!("expected an object of qualities, found {}", value))
    })?;

    let mut qualities = QualityFpsPreferences::new();
    for (fps, quality) in object {
        match decode_entry(fps, quality) {
            Ok((fps, quality)) => {
                qualities.insert(fps, quality);
            }
            Err(e) => warn!("Skipping stored preference for '{}': {}", fps, e),
        }
    }
    Ok(qualities)
}

fn decode_entry(fps: &str, quality: &Value) -> Result<(VideoFps, VideoQuality)> {
    let fps: VideoFps = fps.parse()?;
    let quality = match quality {
        Value::Number(n) => n
            .as_u64()
            .and_then(|h| u32::try_from(h).ok())
            .ok_or_else(|| Error::InvalidQuality(n.to_string()))
            .and_then(VideoQuality::try_from)?,
        Value::String(s) => s.parse()?,
        other => return Err(Error::InvalidQuality(other.to_string())),
    };
    Ok((fps, quality))
}

/// Encode preferences in the stored representation
pub fn encode_qualities(qualities: &QualityFpsPreferences) -> Value {
    let object: Map<String, Value> = qualities
        .iter()
        .map(|(fps, quality)| (fps.to_string(), Value::from(quality.height())))
        .collect();
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn fps(value: u32) -> VideoFps {
        VideoFps::new(value).unwrap()
    }

    /// Store whose reads always fail
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _: StorageArea, _: &str) -> Result<Option<Value>> {
            Err(Error::Io(std::io::Error::other("context invalidated")))
        }

        fn get_all(&self, _: StorageArea) -> Result<Map<String, Value>> {
            Err(Error::Io(std::io::Error::other("context invalidated")))
        }

        fn set(&mut self, _: StorageArea, _: &str, _: Value) -> Result<()> {
            Err(Error::Io(std::io::Error::other("context invalidated")))
        }

        fn remove(&mut self, _: StorageArea, _: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::other("context invalidated")))
        }
    }

    #[test]
    fn test_new_cache_holds_defaults() {
        let cache = PreferenceCache::new();
        assert_eq!(cache.current(), &default_qualities());
    }

    #[test]
    fn test_refresh_without_stored_value() {
        let store = MemoryStore::new();
        let mut cache = PreferenceCache::new();
        assert_eq!(cache.refresh(&store), &default_qualities());
    }

    #[test]
    fn test_refresh_merges_over_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(
                StorageArea::Local,
                QUALITIES_KEY,
                json!({"60": 720, "120": "2160p"}),
            )
            .unwrap();

        let mut cache = PreferenceCache::new();
        let prefs = cache.refresh(&store);

        assert_eq!(prefs.get(&fps(60)), Some(&VideoQuality::P720));
        assert_eq!(prefs.get(&fps(30)), Some(&VideoQuality::P1080));
        assert_eq!(prefs.get(&fps(120)), Some(&VideoQuality::P2160));
        assert_eq!(prefs.len(), 4);
    }

    #[test]
    fn test_refresh_ignores_sync_area() {
        let mut store = MemoryStore::new();
        store
            .set(StorageArea::Sync, QUALITIES_KEY, json!({"60": 144}))
            .unwrap();

        let mut cache = PreferenceCache::new();
        assert_eq!(cache.refresh(&store), &default_qualities());
    }

    #[test]
    fn test_refresh_failure_keeps_last_known() {
        let mut store = MemoryStore::new();
        store
            .set(StorageArea::Local, QUALITIES_KEY, json!({"30": 480}))
            .unwrap();

        let mut cache = PreferenceCache::new();
        let loaded = cache.refresh(&store).clone();

        assert_eq!(cache.refresh(&BrokenStore), &loaded);
        assert_eq!(cache.current().get(&fps(30)), Some(&VideoQuality::P480));
    }

    #[test]
    fn test_refresh_non_object_keeps_last_known() {
        let mut store = MemoryStore::new();
        store
            .set(StorageArea::Local, QUALITIES_KEY, json!({"30": 480}))
            .unwrap();
        let mut cache = PreferenceCache::new();
        cache.refresh(&store);

        store
            .set(StorageArea::Local, QUALITIES_KEY, json!([480]))
            .unwrap();
        let prefs = cache.refresh(&store);
        assert_eq!(prefs.get(&fps(30)), Some(&VideoQuality::P480));
    }

    #[test]
    fn test_refresh_null_value_means_no_preferences() {
        let mut store = MemoryStore::new();
        store
            .set(StorageArea::Local, QUALITIES_KEY, json!({"60": 720}))
            .unwrap();
        let mut cache = PreferenceCache::new();
        cache.refresh(&store);

        store
            .set(StorageArea::Local, QUALITIES_KEY, Value::Null)
            .unwrap();
        assert_eq!(cache.refresh(&store), &default_qualities());
    }

    #[test]
    fn test_refresh_keeps_valid_entries_next_to_bad_ones() {
        let mut store = MemoryStore::new();
        store
            .set(
                StorageArea::Local,
                QUALITIES_KEY,
                json!({"30": 2160, "60": 1000, "sixty": 720}),
            )
            .unwrap();

        let mut cache = PreferenceCache::new();
        let prefs = cache.refresh(&store);

        assert_eq!(prefs.get(&fps(30)), Some(&VideoQuality::P2160));
        assert_eq!(prefs.get(&fps(60)), Some(&VideoQuality::P1080));
        assert_eq!(prefs.len(), 3);
    }

    #[test]
    fn test_save_preference_replaces_bad_entries() {
        let mut store = MemoryStore::new();
        store
            .set(
                StorageArea::Local,
                QUALITIES_KEY,
                json!({"30": 2160, "60": 1000}),
            )
            .unwrap();

        let mut cache = PreferenceCache::new();
        let prefs = cache
            .save_preference(&mut store, fps(60), VideoQuality::P720)
            .unwrap();

        assert_eq!(prefs.get(&fps(30)), Some(&VideoQuality::P2160));
        assert_eq!(prefs.get(&fps(60)), Some(&VideoQuality::P720));
        assert_eq!(
            store.get(StorageArea::Local, QUALITIES_KEY).unwrap(),
            Some(json!({"30": 2160, "60": 720}))
        );
    }

    #[test]
    fn test_save_preference_overwrites_non_object() {
        let mut store = MemoryStore::new();
        store
            .set(StorageArea::Local, QUALITIES_KEY, json!("garbage"))
            .unwrap();

        let mut cache = PreferenceCache::new();
        cache
            .save_preference(&mut store, fps(50), VideoQuality::P480)
            .unwrap();

        assert_eq!(
            store.get(StorageArea::Local, QUALITIES_KEY).unwrap(),
            Some(json!({"50": 480}))
        );
    }

    #[test]
    fn test_save_preference_preserves_other_entries() {
        let mut store = MemoryStore::new();
        let mut cache = PreferenceCache::new();

        cache
            .save_preference(&mut store, fps(30), VideoQuality::P480)
            .unwrap();
        let prefs = cache
            .save_preference(&mut store, fps(60), VideoQuality::P1440)
            .unwrap();

        assert_eq!(prefs.get(&fps(30)), Some(&VideoQuality::P480));
        assert_eq!(prefs.get(&fps(60)), Some(&VideoQuality::P1440));
        assert_eq!(
            store.get(StorageArea::Local, QUALITIES_KEY).unwrap(),
            Some(json!({"30": 480, "60": 1440}))
        );
    }

    #[test]
    fn test_save_preference_store_failure() {
        let mut cache = PreferenceCache::new();
        let result = cache.save_preference(&mut BrokenStore, fps(60), VideoQuality::P720);
        assert!(result.is_err());
        assert_eq!(cache.current(), &default_qualities());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = MemoryStore::new();
        let mut cache = PreferenceCache::new();
        cache
            .save_preference(&mut store, fps(50), VideoQuality::P240)
            .unwrap();

        assert_eq!(cache.reset(&mut store).unwrap(), &default_qualities());
        assert_eq!(store.get(StorageArea::Local, QUALITIES_KEY).unwrap(), None);
    }

    #[test]
    fn test_resolve_uses_cached_preferences() {
        let mut store = MemoryStore::new();
        let mut cache = PreferenceCache::new();
        cache
            .save_preference(&mut store, fps(30), VideoQuality::P2160)
            .unwrap();

        assert_eq!(cache.resolve(fps(24)).unwrap(), (fps(30), VideoQuality::P2160));
        assert_eq!(cache.resolve(fps(144)).unwrap(), (fps(60), VideoQuality::P1080));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(decode_qualities(&json!([1080])).is_err());
        assert!(decode_qualities(&json!(1080)).is_err());
        assert!(decode_qualities(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_decode_skips_bad_entries() {
        let decoded = decode_qualities(&json!({
            "60": 1000,
            "50": true,
            "0": 1080,
            "-30": 720,
            "30": "1440p",
        }))
        .unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get(&fps(30)), Some(&VideoQuality::P1440));
    }
}
