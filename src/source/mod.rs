//! Media acquisition: turning an upload or a remote link into a local artifact.

mod remote;
mod upload;

pub use remote::download_video;
pub use upload::store_upload;

use std::path::{Path, PathBuf};

/// Supported audio file extensions.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "aac", "ogg", "opus", "m4a", "wma", "aiff",
];

/// Supported video file extensions.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "webm", "flv", "wmv", "m4v", "mpeg", "mpg", "3gp",
];

/// Image extensions handled by the single-shot vision path.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Document extensions owned by the text/document pipeline, not this one.
pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "csv", "docx", "pptx", "xlsx", "json", "xml", "txt", "md",
];

/// Broad media kind, decided from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// A locally materialized media input ready for the pipeline.
#[derive(Debug, Clone)]
pub struct AcquiredMedia {
    /// Path of the raw media artifact.
    pub path: PathBuf,
    pub kind: MediaKind,
    /// Display title: the filename for uploads, the remote title for links.
    pub title: String,
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Classify a filename as audio or video, if it is either.
pub fn media_kind(filename: &str) -> Option<MediaKind> {
    let ext = extension_of(filename)?;
    if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Audio)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Check if a filename looks like an image.
pub fn is_image(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Check if a filename looks like a document.
pub fn is_document(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind() {
        assert_eq!(media_kind("song.mp3"), Some(MediaKind::Audio));
        assert_eq!(media_kind("clip.MP4"), Some(MediaKind::Video));
        assert_eq!(media_kind("/path/to/talk.webm"), Some(MediaKind::Video));
        assert_eq!(media_kind("notes.pdf"), None);
        assert_eq!(media_kind("no_extension"), None);
    }

    #[test]
    fn test_is_image_and_document() {
        assert!(is_image("photo.jpeg"));
        assert!(is_image("shot.PNG"));
        assert!(!is_image("clip.mp4"));
        assert!(is_document("report.docx"));
        assert!(!is_document("song.mp3"));
    }
}
