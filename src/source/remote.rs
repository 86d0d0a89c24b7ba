//! Remote link acquisition via yt-dlp.
//!
//! Downloads a capped-resolution single-container rendition of the video
//! and extracts a display title from the returned metadata.

use super::{AcquiredMedia, MediaKind};
use crate::artifact::{ArtifactKind, ArtifactStore};
use crate::config::DownloadSettings;
use crate::error::{Result, SanseError};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};
use url::Url;

/// Title used when the downloader metadata carries none.
const DEFAULT_TITLE: &str = "Unknown video";

/// Download a remote video into a raw-video artifact.
///
/// Resolution is capped and a single container format is requested so the
/// rest of the pipeline sees one predictable input shape.
#[instrument(skip(store, settings), fields(url = %url))]
pub async fn download_video(
    url: &str,
    store: &ArtifactStore,
    settings: &DownloadSettings,
) -> Result<AcquiredMedia> {
    let parsed = Url::parse(url)
        .map_err(|e| SanseError::InvalidInput(format!("Invalid media URL '{}': {}", url, e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(SanseError::InvalidInput(format!(
            "Unsupported URL scheme: {}",
            parsed.scheme()
        )));
    }

    let title = fetch_title(url).await?;
    info!("Downloading video: {}", title);

    let target = store.acquire(ArtifactKind::RawVideo);
    let format = format!(
        "best[height<={}][ext={}]",
        settings.max_height, settings.container
    );

    let result = Command::new("yt-dlp")
        .arg("-f").arg(&format)
        .arg("--merge-output-format").arg(&settings.container)
        .arg("--no-playlist")
        .arg("--quiet")
        .arg("--no-warnings")
        .arg("--output").arg(&target)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SanseError::ToolNotFound("yt-dlp".into()));
        }
        Err(e) => {
            return Err(SanseError::Download(format!("yt-dlp execution failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SanseError::Download(format!("yt-dlp failed: {stderr}")));
    }

    if !target.exists() {
        return Err(SanseError::Download(
            "No matching stream produced a file".into(),
        ));
    }

    debug!("Video downloaded to {}", target.display());

    Ok(AcquiredMedia {
        path: target,
        kind: MediaKind::Video,
        title,
    })
}

/// Fetch the remote title with a metadata-only pass.
async fn fetch_title(url: &str) -> Result<String> {
    let output = Command::new("yt-dlp")
        .args(["--dump-json", "--no-download", "--no-warnings", url])
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SanseError::ToolNotFound("yt-dlp".to_string())
            } else {
                SanseError::Download(format!("Failed to run yt-dlp: {}", e))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SanseError::Download(format!(
            "Video not found or unavailable: {}",
            stderr
        )));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| SanseError::Download(format!("Failed to parse yt-dlp output: {}", e)))?;

    Ok(json["title"].as_str().unwrap_or(DEFAULT_TITLE).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_download_rejects_malformed_url() {
        let temp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::create(temp.path(), Uuid::new_v4()).unwrap();
        let settings = DownloadSettings::default();

        let result = download_video("not a url", &store, &settings).await;
        assert!(matches!(result, Err(SanseError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_download_rejects_non_http_scheme() {
        let temp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::create(temp.path(), Uuid::new_v4()).unwrap();
        let settings = DownloadSettings::default();

        let result = download_video("ftp://example.com/video.mp4", &store, &settings).await;
        assert!(matches!(result, Err(SanseError::InvalidInput(_))));
    }
}
