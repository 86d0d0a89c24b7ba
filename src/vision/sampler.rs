//! Frame extraction from video via ffmpeg.

use super::{FrameReport, FrameSample};
use crate::artifact::{ArtifactKind, ArtifactStore};
use crate::config::SamplingSettings;
use crate::error::{Result, SanseError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Timestamps to sample: fixed interval within the lookahead window, capped
/// at the frame limit. No timestamp reaches `min(duration, window)`.
pub fn sample_timestamps(duration: f64, settings: &SamplingSettings) -> Vec<f64> {
    let end = duration.min(settings.window_seconds as f64);
    let step = settings.interval_seconds.max(1) as f64;

    let mut timestamps = Vec::new();
    let mut t = 0.0;
    while t < end && timestamps.len() < settings.max_frames {
        timestamps.push(t);
        t += step;
    }
    timestamps
}

/// Capture frames at the sampled timestamps.
///
/// Returns successfully captured frames plus failure reports for frames that
/// could not be extracted; a bad frame never aborts the rest.
#[instrument(skip(store, settings), fields(video = %video.display()))]
pub async fn sample_frames(
    video: &Path,
    duration: f64,
    store: &ArtifactStore,
    settings: &SamplingSettings,
) -> (Vec<FrameSample>, Vec<FrameReport>) {
    let mut samples = Vec::new();
    let mut failures = Vec::new();

    for timestamp in sample_timestamps(duration, settings) {
        match capture_frame(video, timestamp, store).await {
            Ok(image_b64) => {
                debug!("Captured frame at {:.0}s", timestamp);
                samples.push(FrameSample {
                    timestamp,
                    image_b64,
                });
            }
            Err(e) => {
                warn!("Failed to capture frame at {:.0}s: {}", timestamp, e);
                failures.push(FrameReport::failed(timestamp, e.to_string()));
            }
        }
    }

    (samples, failures)
}

/// Extract a single frame as JPEG and return it base64-encoded.
async fn capture_frame(video: &Path, timestamp: f64, store: &ArtifactStore) -> Result<String> {
    let dest = store.acquire(ArtifactKind::FrameImage);

    let result = Command::new("ffmpeg")
        .arg("-y")
        .arg("-ss").arg(format!("{:.3}", timestamp))
        .arg("-i").arg(video)
        .arg("-frames:v").arg("1")
        .arg("-q:v").arg("2")
        .arg("-loglevel").arg("error")
        .arg(&dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() && dest.exists() => {
            let bytes = tokio::fs::read(&dest).await?;
            Ok(STANDARD.encode(bytes))
        }
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(SanseError::VisionAnalysis(format!(
                "frame extraction failed: {}",
                err.trim()
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SanseError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(SanseError::VisionAnalysis(format!("ffmpeg error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamps_for_long_clip() {
        let settings = SamplingSettings::default();
        assert_eq!(sample_timestamps(30.0, &settings), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_timestamps_respect_short_duration() {
        let settings = SamplingSettings::default();
        assert_eq!(sample_timestamps(3.0, &settings), vec![0.0, 2.0]);
        assert_eq!(sample_timestamps(0.5, &settings), vec![0.0]);
    }

    #[test]
    fn test_timestamps_never_exceed_window() {
        let settings = SamplingSettings {
            max_frames: 50,
            ..Default::default()
        };
        let timestamps = sample_timestamps(120.0, &settings);
        assert!(timestamps.iter().all(|t| *t < settings.window_seconds as f64));
    }

    #[test]
    fn test_timestamps_capped_at_max_frames() {
        let settings = SamplingSettings::default();
        for duration in [10.0, 20.0, 60.0, 600.0] {
            assert!(sample_timestamps(duration, &settings).len() <= settings.max_frames);
        }
    }

    #[test]
    fn test_zero_duration_samples_nothing() {
        let settings = SamplingSettings::default();
        assert!(sample_timestamps(0.0, &settings).is_empty());
    }
}
