//! Job and output types for the analysis pipeline.

use crate::classify::ContentCategory;
use crate::router::AnalysisMode;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Where the media bytes for a job come from.
#[derive(Clone)]
pub enum MediaSource {
    /// An in-memory upload with its original filename.
    Upload { filename: String, bytes: Vec<u8> },
    /// A link to a video-sharing platform.
    RemoteLink { url: String },
}

impl std::fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaSource::Upload { filename, bytes } => f
                .debug_struct("Upload")
                .field("filename", filename)
                .field("bytes", &bytes.len())
                .finish(),
            MediaSource::RemoteLink { url } => {
                f.debug_struct("RemoteLink").field("url", url).finish()
            }
        }
    }
}

/// One media analysis request.
///
/// A job owns every temp artifact created while processing it and is never
/// shared across requests.
#[derive(Debug, Clone)]
pub struct MediaJob {
    pub id: Uuid,
    pub source: MediaSource,
    pub query: String,
    pub mode: AnalysisMode,
    pub created_at: DateTime<Utc>,
}

impl MediaJob {
    /// Create a job for an uploaded file.
    pub fn upload(filename: impl Into<String>, bytes: Vec<u8>, query: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: MediaSource::Upload {
                filename: filename.into(),
                bytes,
            },
            query: query.into(),
            mode: AnalysisMode::Generic,
            created_at: Utc::now(),
        }
    }

    /// Create a job for a remote media link.
    pub fn remote(url: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: MediaSource::RemoteLink { url: url.into() },
            query: query.into(),
            mode: AnalysisMode::Generic,
            created_at: Utc::now(),
        }
    }

    /// Set the analysis mode chosen by the dispatch router.
    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Final result of a media analysis job. Created once, never mutated.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisOutput {
    /// Local filename or remote title the answer is about.
    pub source_label: String,
    /// The synthesized answer text.
    pub text: String,
    /// Whether the answer was cut at the output size limit.
    pub truncated: bool,
    /// Category assigned by the classifier, when that stage ran.
    pub category: Option<ContentCategory>,
}
