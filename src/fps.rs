//! Frame-rate preference resolution
//!
//! Preferences are keyed on a handful of frame rates. A video plays at some
//! frame rate that may not be one of those keys, so the video is matched to
//! the nearest configured frame rate at or above its own.

use crate::error::{Error, Result};
use crate::types::{VideoFps, VideoQuality};
use std::collections::HashMap;

/// Find the configured frame rate a video running at `fps_to_check` falls under
///
/// Returns the smallest configured frame rate greater than or equal to
/// `fps_to_check`. When the video is faster than every configured frame
/// rate, the largest configured one is returned.
///
/// The mapping's values are not inspected, so any tier representation works.
///
/// # Errors
///
/// [`Error::EmptyPreferences`] if `preferences` has no entries.
///
/// # Example
///
/// ```rust
/// use autohd::{resolve_fps, VideoFps};
/// use std::collections::HashMap;
///
/// let prefs: HashMap<VideoFps, &str> = [(30, "A"), (60, "B"), (120, "C")]
///     .into_iter()
///     .map(|(fps, tier)| (VideoFps::new(fps).unwrap(), tier))
///     .collect();
///
/// assert_eq!(resolve_fps(&prefs, VideoFps::new(45)?)?.get(), 60);
/// assert_eq!(resolve_fps(&prefs, VideoFps::new(200)?)?.get(), 120);
/// # Ok::<(), autohd::Error>(())
/// ```
pub fn resolve_fps<Q>(
    preferences: &HashMap<VideoFps, Q>,
    fps_to_check: VideoFps,
) -> Result<VideoFps> {
    let mut fps_list: Vec<VideoFps> = preferences.keys().copied().collect();
    if fps_list.is_empty() {
        return Err(Error::EmptyPreferences);
    }

    // Descending, so popping walks upwards from the smallest
    fps_list.sort_unstable_by(|a, b| b.cmp(a));

    while fps_list.len() > 1 {
        if let Some(fps_current) = fps_list.pop() {
            if fps_to_check <= fps_current {
                return Ok(fps_current);
            }
        }
    }

    Ok(fps_list[0])
}

/// Resolve the frame rate for a video and return the tier preferred at it
///
/// # Example
///
/// ```rust
/// use autohd::{default_qualities, preferred_quality_for, VideoFps, VideoQuality};
///
/// let (fps, quality) = preferred_quality_for(&default_qualities(), VideoFps::new(24)?)?;
/// assert_eq!(fps.get(), 30);
/// assert_eq!(quality, VideoQuality::P1080);
/// # Ok::<(), autohd::Error>(())
/// ```
pub fn preferred_quality_for(
    preferences: &HashMap<VideoFps, VideoQuality>,
    fps_to_check: VideoFps,
) -> Result<(VideoFps, VideoQuality)> {
    let fps = resolve_fps(preferences, fps_to_check)?;
    let quality = preferences
        .get(&fps)
        .copied()
        .ok_or(Error::EmptyPreferences)?;
    Ok((fps, quality))
}
