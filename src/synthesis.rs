//! Prompt selection and final answer synthesis.

use crate::classify::ContentCategory;
use crate::config::{preview, AnalysisSettings, Prompts};
use crate::error::{Result, SanseError};
use crate::llm::CompletionModel;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Marker appended when output is cut at the size limit.
const TRUNCATION_MARKER: &str = "...\n[Truncated]";

/// Task instruction for each content category.
///
/// `Other` has no fixed instruction; callers fall back to the generic
/// query-driven template.
pub fn instruction_for(category: ContentCategory) -> Option<&'static str> {
    match category {
        ContentCategory::Song => Some(
            "Extract full lyrics from this song. If possible, also note the structure (intro, verse, chorus, bridge).",
        ),
        ContentCategory::Cooking => {
            Some("Summarize the cooking recipe. Mention ingredients and steps.")
        }
        ContentCategory::Lecture => {
            Some("Summarize the key points explained in this lecture.")
        }
        ContentCategory::Interview => {
            Some("List who is speaking and summarize what they say.")
        }
        ContentCategory::Vlog => {
            Some("Describe what the person is doing and where they are.")
        }
        ContentCategory::Other => None,
    }
}

/// A synthesized answer with its truncation state.
#[derive(Debug, Clone)]
pub struct SynthesizedAnswer {
    pub text: String,
    pub truncated: bool,
}

/// Builds the final prompt and runs the synthesis model.
pub struct Synthesizer {
    llm: Arc<dyn CompletionModel>,
    visual_only: String,
    generic: String,
    lyrics: String,
    transcript_chars: usize,
    lyrics_transcript_chars: usize,
    max_output_chars: usize,
}

impl Synthesizer {
    pub fn new(llm: Arc<dyn CompletionModel>, prompts: &Prompts, settings: &AnalysisSettings) -> Self {
        Self {
            llm,
            visual_only: prompts.synthesis.visual_only.clone(),
            generic: prompts.synthesis.generic.clone(),
            lyrics: prompts.lyrics.user.clone(),
            transcript_chars: settings.transcript_chars,
            lyrics_transcript_chars: settings.lyrics_transcript_chars,
            max_output_chars: settings.max_output_chars,
        }
    }

    /// Pick the task instruction for this job.
    ///
    /// An empty transcript overrides every category: the model is told to
    /// work from visuals alone rather than hallucinate speech content.
    pub fn select_instruction(
        &self,
        category: ContentCategory,
        transcript_empty: bool,
        query: &str,
    ) -> String {
        if transcript_empty {
            return self.visual_only.clone();
        }
        match instruction_for(category) {
            Some(instruction) => instruction.to_string(),
            None => {
                let mut vars = HashMap::new();
                vars.insert("query".to_string(), query.to_string());
                Prompts::render(&self.generic, &vars)
            }
        }
    }

    /// Run one synthesis call over visuals, instruction, and transcript.
    #[instrument(skip_all)]
    pub async fn synthesize(
        &self,
        visual_summary: &str,
        instruction: &str,
        transcript: &str,
    ) -> Result<SynthesizedAnswer> {
        let prompt = build_prompt(
            visual_summary,
            instruction,
            &preview(transcript, self.transcript_chars),
        );
        debug!("Synthesis prompt: {} chars", prompt.len());

        let response = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| SanseError::Synthesis(e.to_string()))?;

        Ok(truncate_output(response.trim(), self.max_output_chars))
    }

    /// Format a song transcript as a song sheet with inferred chords.
    #[instrument(skip_all)]
    pub async fn synthesize_lyrics(&self, transcript: &str) -> Result<SynthesizedAnswer> {
        let mut vars = HashMap::new();
        vars.insert(
            "transcript".to_string(),
            preview(transcript, self.lyrics_transcript_chars),
        );
        let prompt = Prompts::render(&self.lyrics, &vars);

        let response = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| SanseError::Synthesis(e.to_string()))?;

        Ok(truncate_output(response.trim(), self.max_output_chars))
    }
}

/// Combine visual observations, transcript, and instruction into one prompt.
fn build_prompt(visual_summary: &str, instruction: &str, transcript: &str) -> String {
    let mut parts = Vec::new();

    if !visual_summary.is_empty() {
        let bullets = visual_summary
            .split("\n\n")
            .filter(|d| !d.trim().is_empty())
            .map(|d| format!("- {}", d.trim()))
            .collect::<Vec<_>>()
            .join("\n");
        parts.push(format!(
            "These are visual observations from the video:\n{}",
            bullets
        ));
    }

    if !transcript.is_empty() {
        parts.push(format!("The transcript of the audio is:\n{}", transcript));
    }

    parts.push(format!(
        "Based on the available audio and visuals, respond to:\n{}",
        instruction
    ));

    parts.join("\n\n")
}

/// Cut output at the character limit, marking the cut.
pub(crate) fn truncate_output(text: &str, max_chars: usize) -> SynthesizedAnswer {
    if text.chars().count() <= max_chars {
        return SynthesizedAnswer {
            text: text.to_string(),
            truncated: false,
        };
    }
    let cut: String = text.chars().take(max_chars).collect();
    SynthesizedAnswer {
        text: format!("{}{}", cut, TRUNCATION_MARKER),
        truncated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoLlm;

    #[async_trait]
    impl CompletionModel for EchoLlm {
        async fn complete(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }
    }

    fn synthesizer() -> Synthesizer {
        Synthesizer::new(
            Arc::new(EchoLlm),
            &Prompts::default(),
            &AnalysisSettings::default(),
        )
    }

    #[test]
    fn test_category_instruction_selected() {
        let s = synthesizer();
        let instruction = s.select_instruction(ContentCategory::Lecture, false, "what is this?");
        assert!(instruction.contains("key points"));
    }

    #[test]
    fn test_other_category_uses_query() {
        let s = synthesizer();
        let instruction =
            s.select_instruction(ContentCategory::Other, false, "how many speakers are there?");
        assert!(instruction.contains("how many speakers are there?"));
    }

    #[test]
    fn test_empty_transcript_overrides_category() {
        let s = synthesizer();
        let instruction = s.select_instruction(ContentCategory::Song, true, "lyrics please");
        assert!(instruction.contains("visuals only"));
        assert!(!instruction.contains("lyrics please"));
    }

    #[test]
    fn test_build_prompt_skips_empty_sections() {
        let prompt = build_prompt("", "Summarize this.", "hello world");
        assert!(!prompt.contains("visual observations"));
        assert!(prompt.contains("hello world"));
        assert!(prompt.contains("Summarize this."));

        let visual_only = build_prompt("a person cooking\n\na pan on a stove", "Describe.", "");
        assert!(visual_only.contains("- a person cooking"));
        assert!(visual_only.contains("- a pan on a stove"));
        assert!(!visual_only.contains("transcript of the audio"));
    }

    #[test]
    fn test_truncate_output_marks_cut() {
        let long = "x".repeat(5000);
        let answer = truncate_output(&long, 4000);
        assert!(answer.truncated);
        assert!(answer.text.ends_with("[Truncated]"));
        assert_eq!(answer.text.chars().count(), 4000 + TRUNCATION_MARKER.chars().count());
    }

    #[test]
    fn test_truncate_output_leaves_short_text() {
        let answer = truncate_output("short answer", 4000);
        assert!(!answer.truncated);
        assert_eq!(answer.text, "short answer");
    }

    #[tokio::test]
    async fn test_synthesize_includes_transcript_and_instruction() {
        let s = synthesizer();
        let answer = s
            .synthesize("a dog in a park", "Describe the scene.", "good boy")
            .await
            .unwrap();
        assert!(answer.text.contains("- a dog in a park"));
        assert!(answer.text.contains("good boy"));
        assert!(answer.text.contains("Describe the scene."));
    }

    #[tokio::test]
    async fn test_synthesize_lyrics_uses_song_sheet_prompt() {
        let s = synthesizer();
        let answer = s.synthesize_lyrics("here comes the sun").await.unwrap();
        assert!(answer.text.contains("song sheet"));
        assert!(answer.text.contains("here comes the sun"));
    }
}
