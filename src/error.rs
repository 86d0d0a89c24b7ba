//! Error types for Sanse.

use thiserror::Error;

/// Library-level error type for Sanse operations.
#[derive(Error, Debug)]
pub enum SanseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Media download failed: {0}")]
    Download(String),

    #[error("Audio extraction failed: {0}")]
    Extraction(String),

    #[error("Audio validation failed: {0}")]
    Validation(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Frame analysis failed: {0}")]
    VisionAnalysis(String),

    #[error("Content classification failed: {0}")]
    Classification(String),

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    #[error("Job was cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SanseError {
    /// Short user-facing description. Never includes raw tool output.
    pub fn user_message(&self) -> String {
        match self {
            SanseError::Download(_) => {
                "The media could not be downloaded. Check the link and try again.".to_string()
            }
            SanseError::Extraction(_) => {
                "The audio track could not be extracted from this media.".to_string()
            }
            SanseError::Validation(_) => "The audio is too short to analyze.".to_string(),
            SanseError::Transcription(_) => {
                "The speech in this media could not be transcribed.".to_string()
            }
            SanseError::Synthesis(_) => {
                "An answer could not be generated for this media.".to_string()
            }
            SanseError::Cancelled => "The request was cancelled.".to_string(),
            SanseError::ToolNotFound(tool) => {
                format!("A required tool ({}) is not installed.", tool)
            }
            SanseError::InvalidInput(msg) => msg.clone(),
            _ => "Media analysis failed due to an internal error.".to_string(),
        }
    }
}

/// Result type alias for Sanse operations.
pub type Result<T> = std::result::Result<T, SanseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_tool_output() {
        let err = SanseError::Download("yt-dlp: ERROR 403 forbidden at line 12".to_string());
        let msg = err.user_message();
        assert!(!msg.contains("yt-dlp"));
        assert!(!msg.contains("403"));
    }

    #[test]
    fn test_user_message_names_missing_tool() {
        let err = SanseError::ToolNotFound("ffmpeg".to_string());
        assert!(err.user_message().contains("ffmpeg"));
    }
}
