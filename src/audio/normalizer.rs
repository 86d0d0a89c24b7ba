//! Audio track extraction and normalization via ffmpeg.
//!
//! Transcription input is always mono 16 kHz signed 16-bit PCM WAV, so the
//! speech-to-text stage never has to care what container the media arrived in.

use crate::artifact::{ArtifactKind, ArtifactStore};
use crate::config::AudioSettings;
use crate::error::{Result, SanseError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Normalized audio ready for transcription.
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    pub path: PathBuf,
    pub duration_seconds: f64,
}

/// Extract the audio track from a video file into a WAV artifact.
#[instrument(skip(store), fields(video = %video.display()))]
pub async fn extract_audio_track(video: &Path, store: &ArtifactStore) -> Result<PathBuf> {
    let dest = store.acquire(ArtifactKind::RawAudio);
    debug!("Extracting audio track to {}", dest.display());

    let result = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i").arg(video)
        .arg("-vn")
        .arg("-f").arg("wav")
        .arg("-loglevel").arg("error")
        .arg(&dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(dest),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(SanseError::Extraction(format!(
                "ffmpeg audio extraction failed: {err}"
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SanseError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(SanseError::Extraction(format!("ffmpeg error: {e}"))),
    }
}

/// Transcode audio to mono, fixed sample rate, signed 16-bit PCM, then
/// validate that it is long enough to transcribe.
#[instrument(skip(store, settings), fields(source = %source.display()))]
pub async fn normalize(
    source: &Path,
    store: &ArtifactStore,
    settings: &AudioSettings,
) -> Result<NormalizedAudio> {
    let dest = store.acquire(ArtifactKind::NormalizedAudio);

    let result = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i").arg(source)
        .arg("-ac").arg("1")
        .arg("-ar").arg(settings.sample_rate.to_string())
        .arg("-sample_fmt").arg("s16")
        .arg("-f").arg("wav")
        .arg("-loglevel").arg("error")
        .arg(&dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => {}
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            return Err(SanseError::Extraction(format!(
                "ffmpeg transcode failed: {err}"
            )));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SanseError::ToolNotFound("ffmpeg".into()));
        }
        Err(e) => return Err(SanseError::Extraction(format!("ffmpeg error: {e}"))),
    }

    let duration_seconds = probe_duration(&dest).await?;
    if duration_seconds < settings.min_duration_seconds {
        return Err(SanseError::Validation(format!(
            "Audio too short for transcription ({:.2}s < {:.2}s)",
            duration_seconds, settings.min_duration_seconds
        )));
    }

    info!("Normalized audio: {:.1}s", duration_seconds);

    Ok(NormalizedAudio {
        path: dest,
        duration_seconds,
    })
}

/// Query the duration of a media file using ffprobe with JSON output.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SanseError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(SanseError::Extraction(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(SanseError::Extraction("ffprobe returned error".into()));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|_| SanseError::Extraction("Invalid ffprobe output".into()))?;

    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| SanseError::Extraction("Could not determine audio duration".into()))
}
