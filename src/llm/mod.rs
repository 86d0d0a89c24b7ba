//! Text completion model abstraction.

mod openai;

pub use openai::OpenAiCompletion;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for single-shot text completion models.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Run one prompt through the model and return its text output.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
