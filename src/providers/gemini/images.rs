//! Gemini Image Generation (Imagen)
//!
//! `models/{model}:predict` with one sample per call.

use async_trait::async_trait;
use base64::Engine;

use super::client::{GeminiClient, PROVIDER_ID};
use super::types::{
    ImagenInstance, ImagenOutputOptions, ImagenParameters, ImagenPredictRequest,
    ImagenPredictResponse,
};
use crate::error::{GenerationError, Result};
use crate::traits::ImageGenerationCapability;
use crate::types::{ImageRequest, InlineImage};

const IMAGE_MIME_TYPE: &str = "image/jpeg";

pub(crate) fn build_imagen_request(request: &ImageRequest) -> ImagenPredictRequest {
    ImagenPredictRequest {
        instances: vec![ImagenInstance {
            prompt: request.prompt.clone(),
        }],
        parameters: ImagenParameters {
            sample_count: 1,
            aspect_ratio: request.aspect_ratio.as_str().to_string(),
            output_options: ImagenOutputOptions {
                mime_type: IMAGE_MIME_TYPE.to_string(),
            },
        },
    }
}

/// First prediction carrying bytes. A response with none is a provider failure.
pub(crate) fn first_image(response: ImagenPredictResponse) -> Result<InlineImage> {
    let prediction = response
        .predictions
        .into_iter()
        .find(|p| p.bytes_base64_encoded.as_deref().is_some_and(|b| !b.is_empty()))
        .ok_or_else(|| GenerationError::ProviderError("no image in response".to_string()))?;

    let encoded = prediction.bytes_base64_encoded.unwrap_or_default();
    let data = base64::engine::general_purpose::STANDARD.decode(encoded.as_bytes())?;
    let mime_type = prediction
        .mime_type
        .unwrap_or_else(|| IMAGE_MIME_TYPE.to_string());
    Ok(InlineImage::new(mime_type, data))
}

#[async_trait]
impl ImageGenerationCapability for GeminiClient {
    async fn generate_image(&self, request: ImageRequest) -> Result<InlineImage> {
        if request.prompt.trim().is_empty() {
            return Err(GenerationError::empty_input("prompt"));
        }

        let model = &self.config().models.image;
        let url = self.endpoint(&format!(
            "models/{}:predict",
            super::video::normalize_gemini_model_id(model)
        ));
        let body = build_imagen_request(&request);
        let response: ImagenPredictResponse = self.post_json(&url, &body).await?;
        let image = first_image(response)?;
        tracing::debug!(
            provider = PROVIDER_ID,
            aspect_ratio = %request.aspect_ratio,
            bytes = image.data.len(),
            "image generated"
        );
        Ok(image)
    }
}
