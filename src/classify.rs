//! Coarse content classification used to pick the synthesis instruction.

use crate::config::{preview, AnalysisSettings, Prompts};
use crate::llm::CompletionModel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Closed set of content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Song,
    Cooking,
    Lecture,
    Interview,
    Vlog,
    Other,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 6] = [
        ContentCategory::Song,
        ContentCategory::Cooking,
        ContentCategory::Lecture,
        ContentCategory::Interview,
        ContentCategory::Vlog,
        ContentCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContentCategory::Song => "song",
            ContentCategory::Cooking => "cooking",
            ContentCategory::Lecture => "lecture",
            ContentCategory::Interview => "interview",
            ContentCategory::Vlog => "vlog",
            ContentCategory::Other => "other",
        }
    }
}

impl std::str::FromStr for ContentCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ContentCategory::ALL
            .iter()
            .find(|c| c.label() == s)
            .copied()
            .ok_or_else(|| format!("Unknown content category: {}", s))
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse a model response into a category.
///
/// Models sometimes wrap the label in a sentence; an embedded label still
/// counts. Anything unrecognizable is `Other`.
pub(crate) fn parse_category(response: &str) -> ContentCategory {
    let normalized = response.trim().to_lowercase();
    if let Ok(category) = normalized.parse() {
        return category;
    }
    ContentCategory::ALL
        .iter()
        .find(|c| normalized.contains(c.label()))
        .copied()
        .unwrap_or(ContentCategory::Other)
}

/// Assigns one category per job from transcript and visuals.
pub struct ContentClassifier {
    llm: Arc<dyn CompletionModel>,
    template: String,
    preview_chars: usize,
}

impl ContentClassifier {
    pub fn new(llm: Arc<dyn CompletionModel>, prompts: &Prompts, settings: &AnalysisSettings) -> Self {
        Self {
            llm,
            template: prompts.classify.user.clone(),
            preview_chars: settings.preview_chars,
        }
    }

    /// Classify media content. Never fails; anything unexpected maps to
    /// `Other` so classification can't take the job down.
    pub async fn classify(&self, transcript: &str, visuals: &str) -> ContentCategory {
        let mut vars = HashMap::new();
        vars.insert(
            "transcript".to_string(),
            preview(transcript, self.preview_chars),
        );
        vars.insert("visuals".to_string(), preview(visuals, self.preview_chars));
        let prompt = Prompts::render(&self.template, &vars);

        match self.llm.complete(&prompt).await {
            Ok(response) => {
                let category = parse_category(&response);
                debug!("Classifier response '{}' -> {}", response.trim(), category);
                category
            }
            Err(e) => {
                warn!("Classification failed, defaulting to 'other': {}", e);
                ContentCategory::Other
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SanseError};
    use async_trait::async_trait;

    #[test]
    fn test_parse_exact_label() {
        assert_eq!(parse_category("song"), ContentCategory::Song);
        assert_eq!(parse_category("  Lecture \n"), ContentCategory::Lecture);
    }

    #[test]
    fn test_parse_embedded_label() {
        assert_eq!(
            parse_category("This is clearly a cooking video."),
            ContentCategory::Cooking
        );
    }

    #[test]
    fn test_parse_garbage_defaults_to_other() {
        assert_eq!(parse_category("no idea"), ContentCategory::Other);
        assert_eq!(parse_category(""), ContentCategory::Other);
    }

    struct FailingLlm;

    #[async_trait]
    impl CompletionModel for FailingLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(SanseError::OpenAI("timeout".into()))
        }
    }

    #[tokio::test]
    async fn test_classifier_failure_yields_other() {
        let classifier = ContentClassifier::new(
            Arc::new(FailingLlm),
            &Prompts::default(),
            &AnalysisSettings::default(),
        );
        let category = classifier.classify("some transcript", "some visuals").await;
        assert_eq!(category, ContentCategory::Other);
    }

    struct EchoLlm(String);

    #[async_trait]
    impl CompletionModel for EchoLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_classifier_parses_model_label() {
        let classifier = ContentClassifier::new(
            Arc::new(EchoLlm("interview".to_string())),
            &Prompts::default(),
            &AnalysisSettings::default(),
        );
        let category = classifier.classify("two people talking", "a studio").await;
        assert_eq!(category, ContentCategory::Interview);
    }
}
