//! Prompt enhancement
//!
//! Rewrites a short image description into a detailed prompt with one text
//! call. Any failure falls back to the original prompt.

use std::sync::Arc;

use crate::traits::TextGenerationCapability;
use crate::types::{TextReply, TextRequest};

/// Instruction template; `{prompt}` is replaced with the user description.
pub const ENHANCEMENT_TEMPLATE: &str = r#"You are a world-class prompt engineer for high-end AI image generation models like Imagen and Midjourney.

Your task: Rewrite the following user description into a highly detailed, photorealistic, and artistic prompt.
Focus on: Lighting, Composition, Texture, 8K resolution, Cinematic effects, and Color Grading.

Constraint: Output ONLY the enhanced English prompt. Do not add any conversational text.

User Description: "{prompt}""#;

pub fn enhancement_instruction(prompt: &str) -> String {
    ENHANCEMENT_TEMPLATE.replace("{prompt}", prompt)
}

pub struct PromptEnhancer<P: ?Sized> {
    provider: Arc<P>,
    model: String,
}

impl<P> PromptEnhancer<P>
where
    P: TextGenerationCapability + ?Sized,
{
    pub fn new(provider: Arc<P>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The rewritten prompt, or `prompt` unchanged when the call fails or returns nothing.
    pub async fn enhance(&self, prompt: &str) -> String {
        let request = TextRequest::new(self.model.clone(), enhancement_instruction(prompt));
        match self.provider.generate_text(request).await {
            Ok(TextReply::Text(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!(model = %self.model, "enhancer returned no text, using original prompt");
                prompt.to_string()
            }
            Err(err) => {
                tracing::warn!(model = %self.model, error = %err, "prompt enhancement failed, using original prompt");
                prompt.to_string()
            }
        }
    }
}
