//! Two-pass transcription engine.

use super::{detect_language_hint, is_degenerate, SpeechToText};
use crate::config::TranscriptionSettings;
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Final transcription result for a job. Immutable once produced.
#[derive(Debug, Clone)]
pub struct TranscriptResult {
    /// Transcript text; empty when discarded or when no usable speech exists.
    pub text: String,
    /// Language of the accepted pass.
    pub language: String,
    /// True when the repetition filter threw the transcript away.
    pub discarded: bool,
    /// 1 for the initial pass, 2 when the language-hint pass was accepted.
    pub pass: u8,
}

impl TranscriptResult {
    /// Placeholder for jobs whose speech channel produced nothing usable.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            language: "und".to_string(),
            discarded: true,
            pass: 1,
        }
    }
}

/// Runs speech-to-text with a corrective language-hint pass and a
/// repetition filter.
pub struct TranscriptionEngine {
    stt: Arc<dyn SpeechToText>,
    hint_threshold: usize,
    min_distinct_words: usize,
}

impl TranscriptionEngine {
    pub fn new(stt: Arc<dyn SpeechToText>, settings: &TranscriptionSettings) -> Self {
        Self {
            stt,
            hint_threshold: settings.hint_threshold,
            min_distinct_words: settings.min_distinct_words,
        }
    }

    /// Transcribe normalized audio, re-running with a forced language when
    /// the keyword heuristic disagrees with the detected language.
    ///
    /// The corrective pass is accepted only when it recovers strictly more
    /// words than the first pass; a failed corrective pass keeps pass 1.
    #[instrument(skip(self, audio_path), fields(title = %title))]
    pub async fn transcribe(&self, audio_path: &Path, title: &str) -> Result<TranscriptResult> {
        let first = self.stt.transcribe(audio_path, None).await?;
        let mut text = first.text.trim().to_string();
        let mut language = first.language;
        let mut pass = 1u8;
        debug!("Pass 1 detected language '{}', {} chars", language, text.len());

        if let Some(hint) = detect_language_hint(title, &text, self.hint_threshold) {
            if hint.code() != language {
                info!(
                    "Language hint '{}' disagrees with detected '{}', re-transcribing",
                    hint.code(),
                    language
                );
                match self.stt.transcribe(audio_path, Some(hint.code())).await {
                    Ok(second) => {
                        let second_text = second.text.trim().to_string();
                        if word_count(&second_text) > word_count(&text) {
                            debug!(
                                "Accepting corrected transcript ({} words > {})",
                                word_count(&second_text),
                                word_count(&text)
                            );
                            text = second_text;
                            language = hint.code().to_string();
                            pass = 2;
                        } else {
                            debug!(
                                "Keeping pass-1 transcript ({} words >= {})",
                                word_count(&text),
                                word_count(&second_text)
                            );
                        }
                    }
                    Err(e) => warn!("Language-hint retry failed, keeping pass 1: {}", e),
                }
            }
        }

        let mut discarded = false;
        if is_degenerate(&text, self.min_distinct_words) {
            warn!("Transcript is repetitive or degenerate, discarding");
            text.clear();
            discarded = true;
        }

        Ok(TranscriptResult {
            text,
            language,
            discarded,
            pass,
        })
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SanseError;
    use crate::transcription::RawTranscript;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Speech-to-text stub with scripted pass-1 and forced-language output.
    struct ScriptedStt {
        pass1: RawTranscript,
        forced: Option<std::result::Result<RawTranscript, String>>,
        calls: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedStt {
        fn new(pass1: RawTranscript) -> Self {
            Self {
                pass1,
                forced: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_forced(mut self, forced: std::result::Result<RawTranscript, String>) -> Self {
            self.forced = Some(forced);
            self
        }
    }

    #[async_trait]
    impl SpeechToText for ScriptedStt {
        async fn transcribe(
            &self,
            _audio_path: &Path,
            language: Option<&str>,
        ) -> Result<RawTranscript> {
            self.calls
                .lock()
                .unwrap()
                .push(language.map(|s| s.to_string()));
            match language {
                None => Ok(self.pass1.clone()),
                Some(_) => match &self.forced {
                    Some(Ok(t)) => Ok(t.clone()),
                    Some(Err(msg)) => Err(SanseError::Transcription(msg.clone())),
                    None => Ok(self.pass1.clone()),
                },
            }
        }
    }

    fn raw(text: &str, language: &str) -> RawTranscript {
        RawTranscript {
            text: text.to_string(),
            language: language.to_string(),
        }
    }

    fn engine(stt: ScriptedStt) -> (TranscriptionEngine, Arc<ScriptedStt>) {
        let stt = Arc::new(stt);
        let settings = TranscriptionSettings::default();
        (
            TranscriptionEngine::new(stt.clone(), &settings),
            stt,
        )
    }

    #[tokio::test]
    async fn test_single_pass_when_no_hint() {
        let (engine, stt) =
            engine(ScriptedStt::new(raw("clear english speech about physics", "en")));

        let result = engine
            .transcribe(Path::new("audio.wav"), "Physics lecture 3")
            .await
            .unwrap();

        assert_eq!(result.pass, 1);
        assert_eq!(result.language, "en");
        assert!(!result.discarded);
        assert_eq!(stt.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_hint_triggers_forced_second_pass() {
        let stt = ScriptedStt::new(raw("some misheard english words here now", "en"))
            .with_forced(Ok(raw(
                "yeh dil tum pyaar zindagi mohabbat sapne kahani gaana",
                "hi",
            )));
        let (engine, stt) = engine(stt);

        let result = engine
            .transcribe(Path::new("audio.wav"), "Kumar Sanu Bollywood song")
            .await
            .unwrap();

        assert_eq!(result.pass, 2);
        assert_eq!(result.language, "hi");
        assert!(result.text.contains("zindagi"));

        let calls = stt.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[None, Some("hi".to_string())]);
    }

    #[tokio::test]
    async fn test_shorter_second_pass_is_rejected() {
        let stt = ScriptedStt::new(raw("a perfectly fine longer first transcript", "en"))
            .with_forced(Ok(raw("short bad output", "hi")));
        let (engine, _) = engine(stt);

        let result = engine
            .transcribe(Path::new("audio.wav"), "Kumar Sanu Bollywood song")
            .await
            .unwrap();

        assert_eq!(result.pass, 1);
        assert_eq!(result.language, "en");
        assert!(result.text.starts_with("a perfectly"));
    }

    #[tokio::test]
    async fn test_failed_second_pass_keeps_first() {
        let stt = ScriptedStt::new(raw("first pass words kept after retry failure", "en"))
            .with_forced(Err("model unavailable".to_string()));
        let (engine, _) = engine(stt);

        let result = engine
            .transcribe(Path::new("audio.wav"), "Kumar Sanu Bollywood song")
            .await
            .unwrap();

        assert_eq!(result.pass, 1);
        assert!(!result.discarded);
    }

    #[tokio::test]
    async fn test_repetitive_transcript_discarded() {
        let (engine, _) = engine(ScriptedStt::new(raw("na na na na na na na na", "en")));

        let result = engine
            .transcribe(Path::new("audio.wav"), "untitled clip")
            .await
            .unwrap();

        assert!(result.discarded);
        assert!(result.text.is_empty());
    }
}
