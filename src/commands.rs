use autohd::{JsonFileStore, PreferenceCache, QualityFpsPreferences, VideoFps, VideoQuality};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Output of the `resolve` command
#[derive(Debug, Serialize)]
struct Resolution {
    requested_fps: VideoFps,
    fps: VideoFps,
    quality: VideoQuality,
}

/// Store location when none is given on the command line
pub fn default_store_path() -> Result<PathBuf, anyhow::Error> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!("Could not determine a data directory. Pass --store explicitly.")
    })?;
    Ok(data_dir.join("autohd").join("storage.json"))
}

/// Resolve a video frame rate against the stored preferences
pub fn resolve(store: &JsonFileStore, fps: u32) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", resolve_output(store, fps)?);
    Ok(())
}

/// Print the merged preferences
pub fn show(store: &JsonFileStore) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", show_output(store)?);
    Ok(())
}

/// Persist one preference
pub fn set(
    store: &mut JsonFileStore,
    fps: u32,
    quality: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", set_output(store, fps, quality)?);
    Ok(())
}

/// Remove stored preferences
pub fn reset(store: &mut JsonFileStore) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", reset_output(store)?);
    Ok(())
}

fn resolve_output(store: &JsonFileStore, fps: u32) -> Result<String, Box<dyn std::error::Error>> {
    let requested_fps = VideoFps::new(fps)?;

    let mut cache = PreferenceCache::new();
    cache.refresh(store);

    let (fps, quality) = cache
        .resolve(requested_fps)
        .map_err(|e| anyhow::anyhow!("Failed to resolve {} fps: {}", requested_fps, e))?;

    Ok(serde_json::to_string_pretty(&Resolution {
        requested_fps,
        fps,
        quality,
    })?)
}

fn show_output(store: &JsonFileStore) -> Result<String, Box<dyn std::error::Error>> {
    let mut cache = PreferenceCache::new();
    preferences_json(cache.refresh(store))
}

fn set_output(
    store: &mut JsonFileStore,
    fps: u32,
    quality: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let fps = VideoFps::new(fps)?;
    let quality: VideoQuality = quality.parse().map_err(|e| {
        anyhow::anyhow!(
            "{}. Valid qualities are: {}",
            e,
            VideoQuality::ALL.map(|q| q.height().to_string()).join(", ")
        )
    })?;

    let mut cache = PreferenceCache::new();
    let prefs = cache.save_preference(store, fps, quality).map_err(|e| {
        anyhow::anyhow!(
            "Failed to save preference to {}: {}",
            store.path().display(),
            e
        )
    })?;
    preferences_json(prefs)
}

fn reset_output(store: &mut JsonFileStore) -> Result<String, Box<dyn std::error::Error>> {
    let mut cache = PreferenceCache::new();
    let prefs = cache.reset(store).map_err(|e| {
        anyhow::anyhow!(
            "Failed to reset preferences in {}: {}",
            store.path().display(),
            e
        )
    })?;
    preferences_json(prefs)
}

fn preferences_json(prefs: &QualityFpsPreferences) -> Result<String, Box<dyn std::error::Error>> {
    // Sorted by frame rate for stable output
    let sorted: BTreeMap<VideoFps, VideoQuality> =
        prefs.iter().map(|(fps, quality)| (*fps, *quality)).collect();
    Ok(serde_json::to_string_pretty(&sorted)?)
}
