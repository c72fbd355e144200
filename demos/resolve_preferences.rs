// Example: Resolve Preferred Quality
//
// This example loads quality preferences from a store file and shows which
// configured frame rate and quality tier a few common video frame rates map to.

use autohd::{JsonFileStore, PreferenceCache, VideoFps};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get store path from command line args, or use a local file
    let store_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "storage.json".to_string());

    println!("Resolving preferences from: {}\n", store_path);

    let store = JsonFileStore::new(&store_path);
    let mut cache = PreferenceCache::new();
    let prefs = cache.refresh(&store);

    let mut configured: Vec<_> = prefs.iter().collect();
    configured.sort();

    println!("Configured preferences:");
    for (fps, quality) in configured {
        println!("  {:>3} fps -> {}", fps, quality);
    }

    println!("\nResolution:");
    for video_fps in [24, 25, 30, 48, 50, 60, 120] {
        let (fps, quality) = cache.resolve(VideoFps::new(video_fps)?)?;
        println!("  {:>3} fps video -> {} fps tier at {}", video_fps, fps, quality);
    }

    Ok(())
}
