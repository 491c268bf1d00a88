//! All four orchestrators over one shared provider.

use std::sync::Arc;

use crate::config::StudioConfig;
use crate::error::Result;
use crate::orchestrator::{
    ChatOrchestrator, ImageOrchestrator, SpeechOrchestrator, VideoOrchestrator,
};
use crate::providers::gemini::GeminiClient;
use crate::traits::StudioProvider;

/// One orchestrator per modality. The modalities share nothing but the provider.
pub struct Studio<P: ?Sized> {
    pub chat: ChatOrchestrator<P>,
    pub image: ImageOrchestrator<P>,
    pub video: VideoOrchestrator<P>,
    pub speech: SpeechOrchestrator<P>,
}

impl Studio<GeminiClient> {
    /// Build a Gemini-backed studio.
    pub fn gemini(config: StudioConfig) -> Result<Self> {
        let client = Arc::new(GeminiClient::new(config.clone())?);
        Ok(Self::with_provider(client, config))
    }
}

impl<P> Studio<P>
where
    P: StudioProvider + ?Sized,
{
    pub fn with_provider(provider: Arc<P>, config: StudioConfig) -> Self {
        Self {
            chat: ChatOrchestrator::new(Arc::clone(&provider)),
            image: ImageOrchestrator::new(Arc::clone(&provider), config.models.enhancer.clone()),
            speech: SpeechOrchestrator::new(Arc::clone(&provider)),
            video: VideoOrchestrator::new(provider, config),
        }
    }
}
