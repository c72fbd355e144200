use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Frame rates the player offers and the defaults are keyed on
pub const SUPPORTED_FPS: [u32; 3] = [30, 50, 60];

/// Mapping from frame rate to the quality tier preferred at that frame rate
///
/// Key order carries no meaning; resolution sorts the keys on every call.
pub type QualityFpsPreferences = HashMap<VideoFps, VideoQuality>;

/// A positive frame rate in frames per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct VideoFps(u32);

impl VideoFps {
    /// Create a frame rate, rejecting zero
    pub fn new(fps: u32) -> Result<Self> {
        if fps == 0 {
            return Err(Error::InvalidFps("frame rate must be positive".to_string()));
        }
        Ok(Self(fps))
    }

    /// Frames per second as a plain integer
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for VideoFps {
    type Error = Error;

    fn try_from(fps: u32) -> Result<Self> {
        Self::new(fps)
    }
}

impl From<VideoFps> for u32 {
    fn from(fps: VideoFps) -> u32 {
        fps.0
    }
}

impl FromStr for VideoFps {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s
            .trim()
            .parse::<u32>()
            .map_err(|e| Error::InvalidFps(format!("'{}': {}", s, e)))?;
        Self::new(value)
    }
}

impl fmt::Display for VideoFps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quality tier identified by its vertical resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum VideoQuality {
    P144,
    P240,
    P360,
    P480,
    P720,
    P1080,
    P1440,
    P2160,
    P4320,
}

impl VideoQuality {
    /// Every tier, lowest first
    pub const ALL: [VideoQuality; 9] = [
        VideoQuality::P144,
        VideoQuality::P240,
        VideoQuality::P360,
        VideoQuality::P480,
        VideoQuality::P720,
        VideoQuality::P1080,
        VideoQuality::P1440,
        VideoQuality::P2160,
        VideoQuality::P4320,
    ];

    /// Vertical resolution in pixels, e.g. `1080` for 1080p
    pub fn height(self) -> u32 {
        match self {
            VideoQuality::P144 => 144,
            VideoQuality::P240 => 240,
            VideoQuality::P360 => 360,
            VideoQuality::P480 => 480,
            VideoQuality::P720 => 720,
            VideoQuality::P1080 => 1080,
            VideoQuality::P1440 => 1440,
            VideoQuality::P2160 => 2160,
            VideoQuality::P4320 => 4320,
        }
    }
}

impl TryFrom<u32> for VideoQuality {
    type Error = Error;

    fn try_from(height: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|q| q.height() == height)
            .ok_or_else(|| Error::InvalidQuality(height.to_string()))
    }
}

impl From<VideoQuality> for u32 {
    fn from(quality: VideoQuality) -> u32 {
        quality.height()
    }
}

impl FromStr for VideoQuality {
    type Err = Error;

    /// Accepts both `1080` and `1080p`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('p').unwrap_or(trimmed);
        let height = digits
            .parse::<u32>()
            .map_err(|_| Error::InvalidQuality(s.to_string()))?;
        Self::try_from(height)
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.height())
    }
}

/// A quality entry as the player labels it, e.g. `1080p60`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YouTubeLabel {
    pub quality: VideoQuality,
    pub fps: Option<VideoFps>,
}

impl FromStr for YouTubeLabel {
    type Err = Error;

    /// Parses labels such as `720p`, `1080p60` and `2160p60 HD`.
    /// Anything after the first whitespace is a badge and is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidLabel(s.to_string());
        let head = s.split_whitespace().next().ok_or_else(invalid)?;
        let (height, fps) = head.split_once('p').ok_or_else(invalid)?;

        let quality = height
            .parse::<u32>()
            .ok()
            .and_then(|h| VideoQuality::try_from(h).ok())
            .ok_or_else(invalid)?;
        let fps = if fps.is_empty() {
            None
        } else {
            Some(fps.parse::<VideoFps>().map_err(|_| invalid())?)
        };

        Ok(Self { quality, fps })
    }
}

impl fmt::Display for YouTubeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fps {
            Some(fps) => write!(f, "{}p{}", self.quality.height(), fps),
            None => write!(f, "{}p", self.quality.height()),
        }
    }
}

/// Built-in preferences used when nothing has been persisted
pub fn default_qualities() -> QualityFpsPreferences {
    SUPPORTED_FPS
        .into_iter()
        .map(|fps| (VideoFps(fps), VideoQuality::P1080))
        .collect()
}
