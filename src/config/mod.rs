//! Configuration management for Sanse.

mod prompts;
mod settings;

pub use prompts::{preview, Prompts};
pub use settings::{
    AnalysisSettings, AudioSettings, DownloadSettings, GeneralSettings, PromptSettings,
    SamplingSettings, Settings, TranscriptionSettings,
};
