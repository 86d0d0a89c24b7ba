//! Inbound request routing.
//!
//! Picks a handler from the user query and attachment filename: remote video
//! links win over attachments, audio queries about lyrics or chords get the
//! specialized song-sheet handler, and documents are named for the text
//! pipeline that owns them.

use crate::source::{is_document, is_image, media_kind, MediaKind};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How an audio job should be analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Classify, then answer with a category-specific instruction.
    Generic,
    /// Produce a formatted song sheet with inferred chords.
    LyricsChords,
}

/// Handler selected for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Uploaded audio file.
    Audio(AnalysisMode),
    /// Uploaded video file.
    Video,
    /// Link to a video-sharing platform found in the query.
    RemoteVideo(String),
    /// Uploaded image; answered with a single vision call.
    Image,
    /// Owned by the document/text pipeline, not this one.
    Document,
    /// Plain question with no media; owned by the text pipeline.
    PlainQuery,
    /// Attachment with an extension nothing handles.
    Unsupported(String),
}

/// Query keywords that select the lyrics/chords handler.
const LYRICS_KEYWORDS: &[&str] = &["chord", "guitar", "lyric"];

/// Maps inbound requests to handlers.
pub struct Router {
    url_regex: Regex,
}

impl Router {
    pub fn new() -> Self {
        let url_regex = Regex::new(
            r"(https?://(?:www\.)?youtube\.com/watch\?v=[\w-]+|https?://youtu\.be/[\w-]+|https?://(?:www\.)?youtube\.com/embed/[\w-]+)",
        )
        .expect("Invalid regex");

        Self { url_regex }
    }

    /// Find a video-platform link in free text.
    pub fn find_remote_url(&self, text: &str) -> Option<String> {
        self.url_regex
            .find(text)
            .map(|m| m.as_str().to_string())
    }

    /// Select a handler for the query and optional attachment filename.
    pub fn dispatch(&self, query: &str, attachment: Option<&str>) -> Dispatch {
        if let Some(url) = self.find_remote_url(query) {
            return Dispatch::RemoteVideo(url);
        }

        let Some(filename) = attachment else {
            return Dispatch::PlainQuery;
        };

        match media_kind(filename) {
            Some(MediaKind::Audio) => Dispatch::Audio(audio_mode(query)),
            Some(MediaKind::Video) => Dispatch::Video,
            None if is_image(filename) => Dispatch::Image,
            None if is_document(filename) => Dispatch::Document,
            None => Dispatch::Unsupported(filename.to_string()),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the audio analysis mode from query intent keywords.
fn audio_mode(query: &str) -> AnalysisMode {
    let query_lower = query.to_lowercase();
    if LYRICS_KEYWORDS.iter().any(|k| query_lower.contains(k)) {
        AnalysisMode::LyricsChords
    } else {
        AnalysisMode::Generic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_link_in_query_wins() {
        let router = Router::new();
        let dispatch = router.dispatch(
            "What are the lyrics of https://www.youtube.com/watch?v=dQw4w9WgXcQ ?",
            Some("notes.mp3"),
        );
        assert_eq!(
            dispatch,
            Dispatch::RemoteVideo("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_link_form() {
        let router = Router::new();
        let url = router.find_remote_url("see https://youtu.be/dQw4w9WgXcQ please");
        assert_eq!(url, Some("https://youtu.be/dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_audio_lyrics_intent() {
        let router = Router::new();
        assert_eq!(
            router.dispatch("Can I get the guitar chords?", Some("song.mp3")),
            Dispatch::Audio(AnalysisMode::LyricsChords)
        );
        assert_eq!(
            router.dispatch("What is this about?", Some("song.mp3")),
            Dispatch::Audio(AnalysisMode::Generic)
        );
    }

    #[test]
    fn test_video_image_document_routes() {
        let router = Router::new();
        assert_eq!(router.dispatch("summarize", Some("talk.mp4")), Dispatch::Video);
        assert_eq!(router.dispatch("what is shown", Some("chart.png")), Dispatch::Image);
        assert_eq!(router.dispatch("summarize", Some("paper.pdf")), Dispatch::Document);
    }

    #[test]
    fn test_unsupported_and_plain() {
        let router = Router::new();
        assert_eq!(
            router.dispatch("open this", Some("archive.zip")),
            Dispatch::Unsupported("archive.zip".to_string())
        );
        assert_eq!(router.dispatch("hello there", None), Dispatch::PlainQuery);
    }
}
