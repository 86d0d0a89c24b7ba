//! Sanse - multimodal media question answering
//!
//! A CLI tool for answering natural-language questions about audio and video:
//! uploaded files or video links are transcribed, video frames are sampled
//! and described, and both channels are fused into a grounded answer.
//!
//! The name "Sanse" comes from the Norwegian word for "sense" or "perceive."
//!
//! # Overview
//!
//! Sanse allows you to:
//! - Analyze local audio/video files or video-platform links
//! - Transcribe speech with a corrective language-hint pass
//! - Describe sampled video frames with a vision model
//! - Get an answer tailored to the content type (song, lecture, recipe, ...)
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `router` - Inbound request routing
//! - `artifact` - Per-job temp artifact lifecycle
//! - `source` - Media acquisition (uploads, remote links)
//! - `audio` - Audio extraction and normalization
//! - `transcription` - Speech-to-text with language hints
//! - `vision` - Frame sampling and visual description
//! - `classify` - Content classification
//! - `synthesis` - Prompt selection and answer synthesis
//! - `pipeline` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use sanse::config::Settings;
//! use sanse::job::MediaJob;
//! use sanse::pipeline::MediaPipeline;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = MediaPipeline::new(settings)?;
//!
//!     let job = MediaJob::remote(
//!         "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!         "What is this video about?",
//!     );
//!     let output = pipeline.analyze_media(&job, &CancellationToken::new()).await?;
//!     println!("{}", output.text);
//!
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod audio;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod llm;
pub mod openai;
pub mod pipeline;
pub mod router;
pub mod source;
pub mod synthesis;
pub mod transcription;
pub mod vision;

pub use error::{Result, SanseError};
