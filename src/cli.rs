use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for autohd
#[derive(Parser, Debug)]
#[command(name = "autohd")]
#[command(about = "Resolve and manage preferred video quality per frame rate")]
pub struct Cli {
    /// Path to the preference store (default: <data dir>/autohd/storage.json)
    #[arg(long, global = true, env = "AUTOHD_STORE")]
    pub store: Option<PathBuf>,

    /// Log store access and cache decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the frame-rate tier and quality for a video
    Resolve {
        /// Frame rate of the video
        #[arg(long)]
        fps: u32,
    },
    /// Show the merged preferences
    Show,
    /// Store the preferred quality for a frame rate
    Set {
        /// Frame rate the preference applies to
        #[arg(long)]
        fps: u32,
        /// Quality tier, e.g. 1080 or 1080p
        #[arg(long)]
        quality: String,
    },
    /// Remove stored preferences and fall back to the defaults
    Reset,
}
