//! The media analysis pipeline.
//!
//! Coordinates acquisition, audio normalization, transcription, frame
//! analysis, classification, and answer synthesis for one job. Temp
//! artifacts are released on every exit path, and cancellation is checked
//! before each external call; an in-flight call is allowed to finish.

use crate::artifact::ArtifactStore;
use crate::audio;
use crate::classify::ContentClassifier;
use crate::config::{Prompts, Settings};
use crate::error::{Result, SanseError};
use crate::job::{AnalysisOutput, MediaJob, MediaSource};
use crate::llm::{CompletionModel, OpenAiCompletion};
use crate::router::AnalysisMode;
use crate::source::{self, AcquiredMedia, MediaKind};
use crate::synthesis::{truncate_output, Synthesizer};
use crate::transcription::{SpeechToText, TranscriptResult, TranscriptionEngine, WhisperTranscriber};
use crate::vision::{self, OpenAiVision, VisionModel};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Message returned when neither speech nor visuals yielded anything.
const NO_CONTENT_MESSAGE: &str = "Unable to extract meaningful content from this media.";

/// The media analysis pipeline.
pub struct MediaPipeline {
    settings: Settings,
    engine: TranscriptionEngine,
    vision: Arc<dyn VisionModel>,
    classifier: ContentClassifier,
    synthesizer: Synthesizer,
    temp_dir: PathBuf,
}

impl MediaPipeline {
    /// Create a pipeline wired to the real external services.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let stt: Arc<dyn SpeechToText> =
            Arc::new(WhisperTranscriber::new(&settings.transcription.model));
        let vision: Arc<dyn VisionModel> = Arc::new(OpenAiVision::new(
            &settings.analysis.vision_model,
            &prompts.frame.user,
        ));
        let classify_llm: Arc<dyn CompletionModel> = Arc::new(
            OpenAiCompletion::new(&settings.analysis.classify_model).with_temperature(0.3),
        );
        let synthesis_llm: Arc<dyn CompletionModel> =
            Arc::new(OpenAiCompletion::new(&settings.analysis.synthesis_model));

        Self::with_components(settings, prompts, stt, vision, classify_llm, synthesis_llm)
    }

    /// Create a pipeline with injected components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        stt: Arc<dyn SpeechToText>,
        vision: Arc<dyn VisionModel>,
        classify_llm: Arc<dyn CompletionModel>,
        synthesis_llm: Arc<dyn CompletionModel>,
    ) -> Result<Self> {
        let temp_dir = settings.temp_dir();
        std::fs::create_dir_all(&temp_dir)?;

        let engine = TranscriptionEngine::new(stt, &settings.transcription);
        let classifier = ContentClassifier::new(classify_llm, &prompts, &settings.analysis);
        let synthesizer = Synthesizer::new(synthesis_llm, &prompts, &settings.analysis);

        Ok(Self {
            settings,
            engine,
            vision,
            classifier,
            synthesizer,
            temp_dir,
        })
    }

    /// Analyze one media job.
    ///
    /// Temp artifacts are always released, whatever the outcome.
    #[instrument(skip(self, job, cancel), fields(job_id = %job.id))]
    pub async fn analyze_media(
        &self,
        job: &MediaJob,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutput> {
        let store = ArtifactStore::create(&self.temp_dir, job.id)?;
        let result = self.run(job, &store, cancel).await;
        store.release_all();
        result
    }

    async fn run(
        &self,
        job: &MediaJob,
        store: &ArtifactStore,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutput> {
        check_cancelled(cancel)?;

        // Acquisition
        let media = match &job.source {
            MediaSource::RemoteLink { url } => {
                source::download_video(url, store, &self.settings.download).await?
            }
            MediaSource::Upload { filename, bytes } => {
                source::store_upload(store, filename, bytes).await?
            }
        };
        info!("Acquired {:?} source: {}", media.kind, media.title);

        // Audio normalization
        check_cancelled(cancel)?;
        let audio_input = match media.kind {
            MediaKind::Video => audio::extract_audio_track(&media.path, store).await?,
            MediaKind::Audio => media.path.clone(),
        };
        let normalized = audio::normalize(&audio_input, store, &self.settings.audio).await?;

        // Transcription
        check_cancelled(cancel)?;
        let transcript = match self.engine.transcribe(&normalized.path, &media.title).await {
            Ok(t) => t,
            Err(e) if media.kind == MediaKind::Video => {
                // The visual channel can still carry the job.
                warn!("Transcription failed, continuing with visuals only: {}", e);
                TranscriptResult::empty()
            }
            Err(e) => return Err(e),
        };

        // Visual sampling and description (video only)
        let visual_summary = if media.kind == MediaKind::Video {
            check_cancelled(cancel)?;
            self.describe_video(&media, &job.query, store).await?
        } else {
            String::new()
        };

        if transcript.text.is_empty() && visual_summary.is_empty() {
            info!("No usable speech or visuals; returning no-content result");
            return Ok(AnalysisOutput {
                source_label: media.title,
                text: NO_CONTENT_MESSAGE.to_string(),
                truncated: false,
                category: None,
            });
        }

        // Specialized song-sheet handler skips classification.
        if job.mode == AnalysisMode::LyricsChords && !transcript.text.is_empty() {
            check_cancelled(cancel)?;
            let answer = self.synthesizer.synthesize_lyrics(&transcript.text).await?;
            return Ok(AnalysisOutput {
                source_label: media.title,
                text: answer.text,
                truncated: answer.truncated,
                category: None,
            });
        }

        // Classification
        check_cancelled(cancel)?;
        let category = self
            .classifier
            .classify(&transcript.text, &visual_summary)
            .await;
        info!("Classified content as '{}'", category);

        // Synthesis
        check_cancelled(cancel)?;
        let instruction =
            self.synthesizer
                .select_instruction(category, transcript.text.is_empty(), &job.query);
        let answer = self
            .synthesizer
            .synthesize(&visual_summary, &instruction, &transcript.text)
            .await?;

        Ok(AnalysisOutput {
            source_label: media.title,
            text: answer.text,
            truncated: answer.truncated,
            category: Some(category),
        })
    }

    /// Sample frames from the video and assemble the visual summary.
    async fn describe_video(
        &self,
        media: &AcquiredMedia,
        query: &str,
        store: &ArtifactStore,
    ) -> Result<String> {
        let duration = audio::probe_duration(&media.path).await?;

        let (samples, failures) =
            vision::sample_frames(&media.path, duration, store, &self.settings.sampling).await;
        info!(
            "Sampled {} frames ({} failed to extract)",
            samples.len(),
            failures.len()
        );

        let mut reports = vision::describe_frames(
            &self.vision,
            samples,
            query,
            self.settings.sampling.max_concurrent,
        )
        .await;
        reports.extend(failures);

        Ok(vision::assemble_summary(reports))
    }

    /// Describe a single uploaded image against the user's query.
    ///
    /// Images skip the audio pipeline entirely; one vision call answers.
    #[instrument(skip(self, bytes), fields(filename = %filename))]
    pub async fn describe_image(
        &self,
        filename: &str,
        bytes: &[u8],
        query: &str,
    ) -> Result<AnalysisOutput> {
        let image_b64 = STANDARD.encode(bytes);
        let text = self.vision.describe(&image_b64, query).await?;
        let answer = truncate_output(text.trim(), self.settings.analysis.max_output_chars);

        Ok(AnalysisOutput {
            source_label: filename.to_string(),
            text: answer.text,
            truncated: answer.truncated,
            category: None,
        })
    }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(SanseError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::RawTranscript;
    use async_trait::async_trait;
    use std::path::Path;

    struct StubStt;

    #[async_trait]
    impl SpeechToText for StubStt {
        async fn transcribe(
            &self,
            _audio_path: &Path,
            _language: Option<&str>,
        ) -> Result<RawTranscript> {
            Ok(RawTranscript {
                text: "stub transcript with enough distinct words".to_string(),
                language: "en".to_string(),
            })
        }
    }

    struct StubVision;

    #[async_trait]
    impl VisionModel for StubVision {
        async fn describe(&self, _image_b64: &str, _context: &str) -> Result<String> {
            Ok("a stub description".to_string())
        }
    }

    struct StubLlm;

    #[async_trait]
    impl CompletionModel for StubLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok("other".to_string())
        }
    }

    fn pipeline(temp_dir: &Path) -> MediaPipeline {
        let mut settings = Settings::default();
        settings.general.temp_dir = temp_dir.to_string_lossy().to_string();

        MediaPipeline::with_components(
            settings,
            Prompts::default(),
            Arc::new(StubStt),
            Arc::new(StubVision),
            Arc::new(StubLlm),
            Arc::new(StubLlm),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let temp = tempfile::tempdir().unwrap();
        let pipeline = pipeline(temp.path());

        let cancel = CancellationToken::new();
        cancel.cancel();

        let job = MediaJob::upload("clip.mp4", vec![0u8; 16], "what is this?");
        let result = pipeline.analyze_media(&job, &cancel).await;

        assert!(matches!(result, Err(SanseError::Cancelled)));
        // The job directory is gone even on the cancel path.
        assert!(!temp.path().join(format!("job-{}", job.id)).exists());
    }

    #[tokio::test]
    async fn test_unsupported_upload_cleans_up() {
        let temp = tempfile::tempdir().unwrap();
        let pipeline = pipeline(temp.path());

        let job = MediaJob::upload("notes.pdf", b"%PDF".to_vec(), "summarize");
        let result = pipeline.analyze_media(&job, &CancellationToken::new()).await;

        assert!(matches!(result, Err(SanseError::InvalidInput(_))));
        assert!(!temp.path().join(format!("job-{}", job.id)).exists());
    }

    #[tokio::test]
    async fn test_describe_image_labels_output() {
        let temp = tempfile::tempdir().unwrap();
        let pipeline = pipeline(temp.path());

        let output = pipeline
            .describe_image("chart.png", b"fake image", "what does it show?")
            .await
            .unwrap();

        assert_eq!(output.source_label, "chart.png");
        assert_eq!(output.text, "a stub description");
        assert!(!output.truncated);
        assert!(output.category.is_none());
    }
}
