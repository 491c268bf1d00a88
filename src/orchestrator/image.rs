//! Image orchestrator
//!
//! Optional prompt enhancement followed by a single image call. Keeps only the
//! latest result.

use std::sync::Arc;

use tokio::sync::watch;

use super::enhance::PromptEnhancer;
use super::{Admission, PendingPermit, Submission};
use crate::traits::{ImageGenerationCapability, TextGenerationCapability};
use crate::types::{AspectRatio, GeneratedImage, ImageRequest, Modality};

/// What the orchestrator is doing, for status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePhase {
    #[default]
    Idle,
    Enhancing,
    Generating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageState {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub enhance: bool,
    pub phase: ImagePhase,
    /// Prompt actually sent for the current or last generation
    pub prompt_used: Option<String>,
    pub result: Option<GeneratedImage>,
    pub error: Option<String>,
    pub pending: bool,
}

impl Default for ImageState {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            aspect_ratio: AspectRatio::default(),
            enhance: true,
            phase: ImagePhase::Idle,
            prompt_used: None,
            result: None,
            error: None,
            pending: false,
        }
    }
}

pub struct ImageOrchestrator<P: ?Sized> {
    provider: Arc<P>,
    enhancer: PromptEnhancer<P>,
    state: watch::Sender<ImageState>,
}

impl<P> ImageOrchestrator<P>
where
    P: ImageGenerationCapability + TextGenerationCapability + ?Sized,
{
    /// `enhancer_model` is the text model used to rewrite prompts.
    pub fn new(provider: Arc<P>, enhancer_model: impl Into<String>) -> Self {
        Self {
            enhancer: PromptEnhancer::new(Arc::clone(&provider), enhancer_model),
            provider,
            state: watch::Sender::new(ImageState::default()),
        }
    }

    pub fn snapshot(&self) -> ImageState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ImageState> {
        self.state.subscribe()
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.state.send_modify(|s| s.prompt = prompt);
    }

    pub fn set_aspect_ratio(&self, ratio: AspectRatio) {
        self.state.send_modify(|s| s.aspect_ratio = ratio);
    }

    pub fn set_enhance(&self, enhance: bool) {
        self.state.send_modify(|s| s.enhance = enhance);
    }

    pub async fn generate(&self) -> Submission {
        let admission = PendingPermit::admit(&self.state, |s| {
            if s.prompt.trim().is_empty() {
                return None;
            }
            let prompt = s.prompt.clone();
            s.error = None;
            s.prompt_used = None;
            s.phase = if s.enhance {
                ImagePhase::Enhancing
            } else {
                ImagePhase::Generating
            };
            Some((prompt, s.aspect_ratio, s.enhance))
        });

        let (_permit, (prompt, aspect_ratio, enhance)) = match admission {
            Admission::Admit(permit, value) => (permit, value),
            Admission::Busy => return Submission::Rejected,
            Admission::Skip => return Submission::Skipped,
        };

        let prompt = if enhance {
            self.enhancer.enhance(&prompt).await
        } else {
            prompt
        };

        let used = prompt.clone();
        self.state.send_modify(|s| {
            s.phase = ImagePhase::Generating;
            s.prompt_used = Some(used);
        });

        let outcome = self
            .provider
            .generate_image(ImageRequest {
                prompt: prompt.clone(),
                aspect_ratio,
            })
            .await;

        match outcome {
            Ok(image) => {
                let generated = GeneratedImage::new(image, prompt);
                self.state.send_modify(|s| {
                    s.result = Some(generated);
                    s.phase = ImagePhase::Idle;
                });
                Submission::Completed
            }
            Err(err) => {
                tracing::warn!(modality = %Modality::Image, error = %err, "image generation failed");
                let notice = err.user_message(Modality::Image).to_string();
                self.state.send_modify(|s| {
                    s.error = Some(notice);
                    s.phase = ImagePhase::Idle;
                });
                Submission::Failed(err)
            }
        }
    }
}
