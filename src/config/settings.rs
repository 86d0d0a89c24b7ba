//! Configuration settings for Sanse.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub download: DownloadSettings,
    pub audio: AudioSettings,
    pub transcription: TranscriptionSettings,
    pub sampling: SamplingSettings,
    pub analysis: AnalysisSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Directory for temporary files.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.sanse".to_string(),
            temp_dir: "/tmp/sanse".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Remote media download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Maximum video height to download.
    pub max_height: u32,
    /// Container format requested from the downloader.
    pub container: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            max_height: 480,
            container: "mp4".to_string(),
        }
    }
}

/// Audio normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Target sample rate for normalized audio.
    pub sample_rate: u32,
    /// Minimum audio duration worth transcribing.
    pub min_duration_seconds: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            min_duration_seconds: 1.0,
        }
    }
}

/// Transcription settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Speech-to-text model to use.
    pub model: String,
    /// Keyword score at which a language hint overrides the detected language.
    pub hint_threshold: usize,
    /// Transcripts with fewer distinct words than this are discarded.
    pub min_distinct_words: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            hint_threshold: 2,
            min_distinct_words: 5,
        }
    }
}

/// Frame sampling settings for video sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    /// Maximum number of frames to sample per job.
    pub max_frames: usize,
    /// Seconds between sampled frames.
    pub interval_seconds: u32,
    /// Only the first N seconds of the clip are sampled.
    pub window_seconds: u32,
    /// Maximum concurrent frame description calls.
    pub max_concurrent: usize,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            max_frames: 5,
            interval_seconds: 2,
            window_seconds: 20,
            max_concurrent: 5,
        }
    }
}

/// Model selection and output bounds for classification and synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Vision-capable model for frame descriptions.
    pub vision_model: String,
    /// Model for content classification.
    pub classify_model: String,
    /// Model for final answer synthesis.
    pub synthesis_model: String,
    /// Characters of transcript/visuals shown to the classifier.
    pub preview_chars: usize,
    /// Characters of transcript included in the synthesis prompt.
    pub transcript_chars: usize,
    /// Characters of transcript included in the song-sheet prompt.
    pub lyrics_transcript_chars: usize,
    /// Maximum characters of synthesized output before truncation.
    pub max_output_chars: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            vision_model: "gpt-4o-mini".to_string(),
            classify_model: "gpt-4o-mini".to_string(),
            synthesis_model: "gpt-4o-mini".to_string(),
            preview_chars: 1000,
            transcript_chars: 1500,
            lyrics_transcript_chars: 3000,
            max_output_chars: 4000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SanseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sanse")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_bounds() {
        let settings = Settings::default();
        assert_eq!(settings.download.max_height, 480);
        assert_eq!(settings.audio.sample_rate, 16_000);
        assert_eq!(settings.transcription.hint_threshold, 2);
        assert_eq!(settings.transcription.min_distinct_words, 5);
        assert_eq!(settings.sampling.max_frames, 5);
        assert_eq!(settings.sampling.interval_seconds, 2);
        assert_eq!(settings.sampling.window_seconds, 20);
        assert_eq!(settings.analysis.max_output_chars, 4000);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = PathBuf::from("/nonexistent/sanse/config.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.general.log_level, "info");
    }
}
