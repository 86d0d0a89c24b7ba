//! Frame sampling and visual description for video sources.

mod openai;
mod sampler;

pub use openai::OpenAiVision;
pub use sampler::{sample_frames, sample_timestamps};

use crate::error::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::warn;

/// A still frame captured from the video.
#[derive(Debug, Clone)]
pub struct FrameSample {
    /// Capture time in seconds from the start of the clip.
    pub timestamp: f64,
    /// JPEG payload, base64-encoded.
    pub image_b64: String,
}

/// Outcome of describing one frame.
#[derive(Debug, Clone)]
pub enum FrameOutcome {
    Described(String),
    Failed(String),
}

/// A frame paired with its description outcome.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub timestamp: f64,
    pub outcome: FrameOutcome,
}

impl FrameReport {
    pub fn failed(timestamp: f64, reason: impl Into<String>) -> Self {
        Self {
            timestamp,
            outcome: FrameOutcome::Failed(reason.into()),
        }
    }

    /// Text that goes into the visual summary; failures become placeholders.
    pub fn summary_text(&self) -> String {
        match &self.outcome {
            FrameOutcome::Described(text) => text.clone(),
            FrameOutcome::Failed(reason) => format!(
                "[Frame at {:.0}s could not be analyzed: {}]",
                self.timestamp, reason
            ),
        }
    }
}

/// Trait for vision-capable description models.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Describe a single image; `context` carries the user's query.
    async fn describe(&self, image_b64: &str, context: &str) -> Result<String>;
}

/// Describe sampled frames with bounded concurrency.
///
/// Per-frame failures are recorded, never propagated; one bad frame must not
/// cost the job its other descriptions. Completion order is not meaningful,
/// use [`assemble_summary`] to get timestamp order back.
pub async fn describe_frames(
    vision: &Arc<dyn VisionModel>,
    frames: Vec<FrameSample>,
    context: &str,
    max_concurrent: usize,
) -> Vec<FrameReport> {
    stream::iter(frames)
        .map(|frame| {
            let vision = vision.clone();
            let context = context.to_string();
            async move {
                match vision.describe(&frame.image_b64, &context).await {
                    Ok(text) => FrameReport {
                        timestamp: frame.timestamp,
                        outcome: FrameOutcome::Described(text.trim().to_string()),
                    },
                    Err(e) => {
                        warn!("Frame at {:.0}s failed to analyze: {}", frame.timestamp, e);
                        FrameReport::failed(frame.timestamp, e.to_string())
                    }
                }
            }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await
}

/// Join frame reports into one visual-summary string, ordered by timestamp.
pub fn assemble_summary(mut reports: Vec<FrameReport>) -> String {
    reports.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    reports
        .iter()
        .map(|r| r.summary_text())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SanseError;

    /// Vision stub that fails on configured payloads.
    struct FlakyVision {
        fail_on: Vec<String>,
    }

    #[async_trait]
    impl VisionModel for FlakyVision {
        async fn describe(&self, image_b64: &str, _context: &str) -> Result<String> {
            if self.fail_on.iter().any(|f| f == image_b64) {
                Err(SanseError::VisionAnalysis("model rejected image".into()))
            } else {
                Ok(format!("description of {}", image_b64))
            }
        }
    }

    fn frame(timestamp: f64, payload: &str) -> FrameSample {
        FrameSample {
            timestamp,
            image_b64: payload.to_string(),
        }
    }

    #[tokio::test]
    async fn test_failures_become_placeholders() {
        let vision: Arc<dyn VisionModel> = Arc::new(FlakyVision {
            fail_on: vec!["b".to_string()],
        });

        let frames = vec![frame(0.0, "a"), frame(2.0, "b"), frame(4.0, "c")];
        let reports = describe_frames(&vision, frames, "what is this?", 5).await;
        let summary = assemble_summary(reports);

        assert!(summary.contains("description of a"));
        assert!(summary.contains("could not be analyzed"));
        assert!(summary.contains("description of c"));
    }

    #[tokio::test]
    async fn test_summary_preserves_timestamp_order() {
        let vision: Arc<dyn VisionModel> = Arc::new(FlakyVision { fail_on: vec![] });

        // Deliberately out of order; assembly must sort by timestamp.
        let frames = vec![frame(4.0, "late"), frame(0.0, "early"), frame(2.0, "mid")];
        let reports = describe_frames(&vision, frames, "", 2).await;
        let summary = assemble_summary(reports);

        let early = summary.find("early").unwrap();
        let mid = summary.find("mid").unwrap();
        let late = summary.find("late").unwrap();
        assert!(early < mid && mid < late);
    }

    #[test]
    fn test_placeholder_mentions_timestamp() {
        let report = FrameReport::failed(6.0, "timeout");
        assert!(report.summary_text().contains("6s"));
        assert!(report.summary_text().contains("timeout"));
    }
}
