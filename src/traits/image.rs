use async_trait::async_trait;

use crate::error::GenerationError;
use crate::types::{ImageRequest, InlineImage};

/// Single-image generation.
#[async_trait]
pub trait ImageGenerationCapability: Send + Sync {
    /// Generate exactly one image. Fails when the provider returns no image bytes.
    async fn generate_image(&self, request: ImageRequest) -> Result<InlineImage, GenerationError>;
}
