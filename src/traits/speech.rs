use async_trait::async_trait;

use crate::error::GenerationError;
use crate::types::{SpeechAudio, SpeechRequest};

/// Text-to-speech with a prebuilt voice.
#[async_trait]
pub trait SpeechGenerationCapability: Send + Sync {
    /// Synthesize `request.text`. Fails when the provider returns no audio payload.
    async fn generate_speech(&self, request: SpeechRequest) -> Result<SpeechAudio, GenerationError>;
}
