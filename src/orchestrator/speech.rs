//! Speech orchestrator

use std::sync::Arc;

use tokio::sync::watch;

use super::{Admission, PendingPermit, Submission};
use crate::traits::SpeechGenerationCapability;
use crate::types::{Modality, SpeechAudio, SpeechRequest, VoiceName};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeechState {
    pub text: String,
    pub voice: VoiceName,
    pub audio: Option<SpeechAudio>,
    pub error: Option<String>,
    pub pending: bool,
}

pub struct SpeechOrchestrator<P: ?Sized> {
    provider: Arc<P>,
    state: watch::Sender<SpeechState>,
}

impl<P> SpeechOrchestrator<P>
where
    P: SpeechGenerationCapability + ?Sized,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            state: watch::Sender::new(SpeechState::default()),
        }
    }

    pub fn snapshot(&self) -> SpeechState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SpeechState> {
        self.state.subscribe()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| s.text = text);
    }

    pub fn select_voice(&self, voice: VoiceName) {
        self.state.send_modify(|s| s.voice = voice);
    }

    /// Synthesize the current text. Previous audio is dropped before the call.
    pub async fn generate(&self) -> Submission {
        let admission = PendingPermit::admit(&self.state, |s| {
            if s.text.trim().is_empty() {
                return None;
            }
            s.audio = None;
            s.error = None;
            Some(SpeechRequest {
                text: s.text.clone(),
                voice: s.voice,
            })
        });

        let (_permit, request) = match admission {
            Admission::Admit(permit, request) => (permit, request),
            Admission::Busy => return Submission::Rejected,
            Admission::Skip => return Submission::Skipped,
        };

        let voice = request.voice;
        match self.provider.generate_speech(request).await {
            Ok(mut audio) => {
                audio.voice = voice;
                self.state.send_modify(|s| s.audio = Some(audio));
                Submission::Completed
            }
            Err(err) => {
                tracing::warn!(modality = %Modality::Speech, voice = %voice, error = %err, "speech generation failed");
                let notice = err.user_message(Modality::Speech).to_string();
                self.state.send_modify(|s| s.error = Some(notice));
                Submission::Failed(err)
            }
        }
    }
}
