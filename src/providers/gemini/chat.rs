//! Gemini Text Generation
//!
//! Single-turn `generateContent` calls. The conversation log is display-only,
//! so each request carries just the current prompt and optional image.

use async_trait::async_trait;

use super::client::{GeminiClient, PROVIDER_ID};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::error::{GenerationError, Result};
use crate::traits::TextGenerationCapability;
use crate::types::{TextReply, TextRequest};

/// Build the request body. The image part, when present, precedes the text part.
pub(crate) fn build_text_request(request: &TextRequest) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);
    if let Some(image) = request.image.as_ref().filter(|i| !i.is_empty()) {
        parts.push(Part::inline(image.mime_type.clone(), image.to_base64()));
    }
    parts.push(Part::text(request.prompt.clone()));

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: None,
    }
}

pub(crate) fn generate_content_url(client: &GeminiClient, model: &str) -> String {
    client.endpoint(&format!(
        "models/{}:generateContent",
        super::video::normalize_gemini_model_id(model)
    ))
}

#[async_trait]
impl TextGenerationCapability for GeminiClient {
    async fn generate_text(&self, request: TextRequest) -> Result<TextReply> {
        if request.prompt.trim().is_empty() && request.image.is_none() {
            return Err(GenerationError::empty_input("prompt"));
        }

        let body = build_text_request(&request);
        let url = generate_content_url(self, &request.model);
        let response: GenerateContentResponse = self.post_json(&url, &body).await?;

        match response.text() {
            Some(text) => Ok(TextReply::Text(text)),
            None => {
                tracing::debug!(provider = PROVIDER_ID, model = %request.model, "reply carried no text");
                Ok(TextReply::Empty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InlineImage;

    #[test]
    fn image_part_comes_first() {
        let req = TextRequest::new("gemini-2.5-flash", "what is this?")
            .with_image(Some(InlineImage::new("image/png", vec![1, 2, 3])));
        let json = serde_json::to_value(build_text_request(&req)).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "AQID");
        assert_eq!(parts[1]["text"], "what is this?");
        assert_eq!(json["contents"][0]["role"], "user");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn text_only_has_one_part() {
        let req = TextRequest::new("gemini-2.5-flash", "hi");
        let json = serde_json::to_value(build_text_request(&req)).unwrap();
        assert_eq!(json["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }
}
