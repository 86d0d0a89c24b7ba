//! OpenAI vision model implementation.

use super::VisionModel;
use crate::config::Prompts;
use crate::error::{Result, SanseError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, ImageDetail, ImageUrlArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Vision-capable chat model for frame and image description.
pub struct OpenAiVision {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompt_template: String,
}

impl OpenAiVision {
    pub fn new(model: &str, prompt_template: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            prompt_template: prompt_template.to_string(),
        }
    }
}

#[async_trait]
impl VisionModel for OpenAiVision {
    async fn describe(&self, image_b64: &str, context: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("query".to_string(), context.to_string());
        let prompt = Prompts::render(&self.prompt_template, &vars);

        let text_part = ChatCompletionRequestMessageContentPartTextArgs::default()
            .text(prompt)
            .build()
            .map_err(|e| SanseError::VisionAnalysis(e.to_string()))?;

        let image_part = ChatCompletionRequestMessageContentPartImageArgs::default()
            .image_url(
                ImageUrlArgs::default()
                    .url(format!("data:image/jpeg;base64,{}", image_b64))
                    .detail(ImageDetail::Auto)
                    .build()
                    .map_err(|e| SanseError::VisionAnalysis(e.to_string()))?,
            )
            .build()
            .map_err(|e| SanseError::VisionAnalysis(e.to_string()))?;

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(vec![text_part.into(), image_part.into()])
            .build()
            .map_err(|e| SanseError::VisionAnalysis(e.to_string()))?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![message.into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| SanseError::VisionAnalysis(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SanseError::OpenAI(format!("Vision request failed: {}", e)))?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SanseError::VisionAnalysis("Empty response from vision model".into()))?
            .clone();

        debug!("Vision model returned {} chars", text.len());
        Ok(text)
    }
}
