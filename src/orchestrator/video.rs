//! Video orchestrator
//!
//! New scenes and one-shot extensions of the current clip, with a session
//! history of every result.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use super::{Admission, PendingPermit, Submission};
use crate::config::{ModelSet, StudioConfig};
use crate::operation::OperationPoller;
use crate::traits::VideoGenerationCapability;
use crate::types::{GeneratedVideo, Modality, VideoHistory, VideoMode, VideoRequest};
use crate::utils::CancelHandle;

/// Prompt pre-filled when extend mode is switched on.
pub const EXTEND_PROMPT_HINT: &str = "The camera slowly pulls back and the scene...";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoState {
    pub prompt: String,
    pub mode: VideoMode,
    pub current: Option<GeneratedVideo>,
    pub history: VideoHistory,
    pub error: Option<String>,
    pub pending: bool,
}

pub struct VideoOrchestrator<P: ?Sized> {
    provider: Arc<P>,
    config: StudioConfig,
    state: watch::Sender<VideoState>,
    cancel: Mutex<Option<CancelHandle>>,
}

impl<P> VideoOrchestrator<P>
where
    P: VideoGenerationCapability + ?Sized,
{
    /// `config` supplies the Veo models and the poll schedule.
    pub fn new(provider: Arc<P>, config: StudioConfig) -> Self {
        Self {
            provider,
            config,
            state: watch::Sender::new(VideoState::default()),
            cancel: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> VideoState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<VideoState> {
        self.state.subscribe()
    }

    fn models(&self) -> &ModelSet {
        &self.config.models
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.state.send_modify(|s| s.prompt = prompt);
    }

    /// Switch between new-scene and extend. Needs a current clip; no-op otherwise.
    pub fn toggle_extend(&self) {
        self.state.send_if_modified(|s| {
            if s.current.is_none() {
                return false;
            }
            match s.mode {
                VideoMode::NewScene => {
                    s.mode = VideoMode::Extend;
                    s.prompt = EXTEND_PROMPT_HINT.to_string();
                }
                VideoMode::Extend => {
                    s.mode = VideoMode::NewScene;
                    s.prompt.clear();
                }
            }
            true
        });
    }

    /// Make a history entry current. Always leaves extend mode.
    pub fn select_history(&self, index: usize) {
        self.state.send_if_modified(|s| {
            let Some(video) = s.history.get(index).cloned() else {
                return false;
            };
            s.current = Some(video);
            s.mode = VideoMode::NewScene;
            true
        });
    }

    /// Stop waiting for the in-flight job. The provider keeps running it.
    pub fn cancel(&self) {
        if let Ok(guard) = self.cancel.lock()
            && let Some(handle) = guard.as_ref()
        {
            handle.cancel();
        }
    }

    pub async fn generate(&self) -> Submission {
        let models = self.models();
        let admission = PendingPermit::admit(&self.state, |s| {
            if s.prompt.trim().is_empty() {
                return None;
            }
            let prompt = s.prompt.clone();
            s.error = None;
            let previous = match s.mode {
                VideoMode::Extend => s.current.as_ref().map(|v| v.asset.clone()),
                VideoMode::NewScene => None,
            };
            Some(VideoRequest::for_prompt(models, prompt, previous))
        });

        let (_permit, request) = match admission {
            Admission::Admit(permit, request) => (permit, request),
            Admission::Busy => return Submission::Rejected,
            Admission::Skip => return Submission::Skipped,
        };

        let cancel = CancelHandle::default();
        if let Ok(mut slot) = self.cancel.lock() {
            *slot = Some(cancel.clone());
        }

        let prompt = request.prompt.clone();
        let extended = request.is_extension();
        let outcome = OperationPoller::from_config(&*self.provider, &self.config)
            .with_cancel(cancel)
            .run(request)
            .await;

        if let Ok(mut slot) = self.cancel.lock() {
            *slot = None;
        }

        match outcome {
            Ok(clip) => {
                let video = GeneratedVideo::from_clip(clip, prompt);
                self.state.send_modify(|s| {
                    s.history.prepend(video.clone());
                    s.current = Some(video);
                    if extended {
                        s.mode = VideoMode::NewScene;
                        s.prompt.clear();
                    }
                });
                Submission::Completed
            }
            Err(err) => {
                tracing::warn!(modality = %Modality::Video, extend = extended, error = %err, "video generation failed");
                let notice = err.user_message(Modality::Video).to_string();
                self.state.send_modify(|s| s.error = Some(notice));
                Submission::Failed(err)
            }
        }
    }
}
