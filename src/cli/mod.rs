//! CLI module for Sanse.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Sanse - ask questions about audio and video
///
/// Analyzes uploaded media files or video links by transcribing speech and
/// describing sampled frames, then answers the question with a language model.
/// The name "Sanse" comes from the Norwegian word for "sense" or "perceive."
#[derive(Parser, Debug)]
#[command(name = "sanse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check external tools and configuration
    Doctor,

    /// Analyze a media file or video link and answer a question about it
    Analyze {
        /// Local audio/video/image file path, or a video link
        input: String,

        /// Question to answer about the media
        #[arg(short, long, default_value = "What is this media about?")]
        query: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
