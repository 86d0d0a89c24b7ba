//! Speech-to-text transcription with language-hint correction.
//!
//! Transcription runs in up to two passes: a first pass with automatic
//! language detection, and an optional corrective pass forcing a language
//! inferred from keywords in the title and first-pass text.

mod engine;
mod hints;
mod whisper;

pub use engine::{TranscriptionEngine, TranscriptResult};
pub use hints::{detect_language_hint, is_degenerate, LanguageHint};
pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Raw output of a single speech-to-text pass.
#[derive(Debug, Clone)]
pub struct RawTranscript {
    pub text: String,
    /// ISO 639-1 language code reported by the model.
    pub language: String,
}

/// Trait for speech-to-text services.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe an audio file, optionally forcing the given language.
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<RawTranscript>;
}
