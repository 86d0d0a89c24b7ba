//! Audio extraction and normalization.

mod normalizer;

pub use normalizer::{extract_audio_track, normalize, probe_duration, NormalizedAudio};
