//! Prompt templates for Sanse.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub frame: FramePrompts,
    pub classify: ClassifyPrompts,
    pub synthesis: SynthesisPrompts,
    pub lyrics: LyricsPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompt sent to the vision model for each sampled frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FramePrompts {
    pub user: String,
}

impl Default for FramePrompts {
    fn default() -> Self {
        Self {
            user: r#"Describe what is visually happening in this frame of the video.

Viewer question, for context:
{{query}}"#
                .to_string(),
        }
    }
}

/// Prompt for content classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyPrompts {
    pub user: String,
}

impl Default for ClassifyPrompts {
    fn default() -> Self {
        Self {
            user: r#"You are analyzing a piece of media.
Based on the following transcript and visual description, classify what kind of content this is. Answer with exactly one of:
- song
- cooking
- lecture
- interview
- vlog
- other

Transcript (partial): {{transcript}}
Visuals (partial): {{visuals}}"#
                .to_string(),
        }
    }
}

/// Instruction fallbacks for answer synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisPrompts {
    /// Used when the transcript was discarded or empty.
    pub visual_only: String,
    /// Used when no category-specific instruction applies.
    pub generic: String,
}

impl Default for SynthesisPrompts {
    fn default() -> Self {
        Self {
            visual_only: "The transcript was unreliable. Based on the visuals only, describe what is happening in this video.".to_string(),
            generic: "Based on the available transcript and visuals, respond to:\n{{query}}".to_string(),
        }
    }
}

/// Song-sheet prompt for the lyrics/chords handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsPrompts {
    pub user: String,
}

impl Default for LyricsPrompts {
    fn default() -> Self {
        Self {
            user: r#"This is a transcript of a song. Format it as a song sheet.
Add appropriate line breaks and sections (like Verse, Chorus, Bridge).
If possible, infer common chord progressions and place chords above the lyrics.
Only use chords like [C], [G], [Am], [F], etc. where they make musical sense.
If unsure, leave that part without chords.

Transcript:
{{transcript}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let frame_path = custom_path.join("frame.toml");
            if frame_path.exists() {
                let content = std::fs::read_to_string(&frame_path)?;
                prompts.frame = toml::from_str(&content)?;
            }

            let classify_path = custom_path.join("classify.toml");
            if classify_path.exists() {
                let content = std::fs::read_to_string(&classify_path)?;
                prompts.classify = toml::from_str(&content)?;
            }

            let synthesis_path = custom_path.join("synthesis.toml");
            if synthesis_path.exists() {
                let content = std::fs::read_to_string(&synthesis_path)?;
                prompts.synthesis = toml::from_str(&content)?;
            }

            let lyrics_path = custom_path.join("lyrics.toml");
            if lyrics_path.exists() {
                let content = std::fs::read_to_string(&lyrics_path)?;
                prompts.lyrics = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

/// Truncate text to a bounded number of characters for prompt previews.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.frame.user.is_empty());
        assert!(prompts.classify.user.contains("song"));
        assert!(prompts.lyrics.user.contains("Chorus"));
    }

    #[test]
    fn test_render_template() {
        let template = "Transcript: {{transcript}} / Visuals: {{visuals}}";
        let mut vars = std::collections::HashMap::new();
        vars.insert("transcript".to_string(), "hello".to_string());
        vars.insert("visuals".to_string(), "a stage".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Transcript: hello / Visuals: a stage");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef", 3), "abc");
        // Multi-byte characters must not be split mid-codepoint.
        assert_eq!(preview("ααααα", 2), "αα");
    }
}
