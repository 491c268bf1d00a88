use async_trait::async_trait;

use crate::error::GenerationError;
use crate::types::{TextReply, TextRequest};

/// Text and vision generation.
#[async_trait]
pub trait TextGenerationCapability: Send + Sync {
    /// Generate a reply for a prompt, optionally grounded on an attached image.
    ///
    /// A response without any text yields [`TextReply::Empty`], not an error.
    async fn generate_text(&self, request: TextRequest) -> Result<TextReply, GenerationError>;
}
