//! Chat orchestrator

use std::sync::Arc;

use tokio::sync::watch;

use super::{Admission, PendingPermit, Submission};
use crate::traits::TextGenerationCapability;
use crate::types::{
    ChatModel, ConversationHistory, InlineImage, Message, Modality, TextReply, TextRequest,
};

pub const WELCOME_MESSAGE: &str = "Hello! I'm SKRAN, your professional AI assistant. Pick Gemini 3 Pro or GPT-5.1 mode to get started.";
/// Sent in place of an empty prompt when only an image is attached.
pub const IMAGE_ONLY_PROMPT: &str = "Analyze this image.";
pub const EMPTY_REPLY_TEXT: &str = "No response was generated.";

#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    pub history: ConversationHistory,
    pub input: String,
    pub attached_image: Option<InlineImage>,
    pub model: ChatModel,
    pub pending: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        let mut history = ConversationHistory::new();
        history.push(Message::system(WELCOME_MESSAGE));
        Self {
            history,
            input: String::new(),
            attached_image: None,
            model: ChatModel::default(),
            pending: false,
        }
    }
}

pub struct ChatOrchestrator<P: ?Sized> {
    provider: Arc<P>,
    state: watch::Sender<ChatState>,
}

impl<P> ChatOrchestrator<P>
where
    P: TextGenerationCapability + ?Sized,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            state: watch::Sender::new(ChatState::default()),
        }
    }

    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }

    pub fn set_input(&self, input: impl Into<String>) {
        let input = input.into();
        self.state.send_modify(|s| s.input = input);
    }

    pub fn attach_image(&self, image: Option<InlineImage>) {
        self.state.send_modify(|s| s.attached_image = image);
    }

    pub fn select_model(&self, model: ChatModel) {
        self.state.send_modify(|s| s.model = model);
    }

    /// Send the draft input (and attachment) and append the reply.
    pub async fn submit(&self) -> Submission {
        let admission = PendingPermit::admit(&self.state, |s| {
            let blank = s.input.trim().is_empty();
            if blank && s.attached_image.is_none() {
                return None;
            }
            let image = s.attached_image.take();
            let text = std::mem::take(&mut s.input);
            s.history.push(Message::user(text.clone()).with_image(image.clone()));

            let prompt = if blank {
                IMAGE_ONLY_PROMPT.to_string()
            } else {
                text
            };
            Some(TextRequest::new(s.model.backend_model_id(), prompt).with_image(image))
        });

        let (_permit, request) = match admission {
            Admission::Admit(permit, request) => (permit, request),
            Admission::Busy => return Submission::Rejected,
            Admission::Skip => return Submission::Skipped,
        };

        let model = request.model.clone();
        match self.provider.generate_text(request).await {
            Ok(reply) => {
                let text = match reply {
                    TextReply::Text(text) => text,
                    TextReply::Empty => EMPTY_REPLY_TEXT.to_string(),
                };
                self.state.send_modify(|s| s.history.push(Message::model(text)));
                Submission::Completed
            }
            Err(err) => {
                tracing::warn!(modality = %Modality::Chat, model = %model, error = %err, "chat request failed");
                let notice = err.user_message(Modality::Chat);
                self.state.send_modify(|s| s.history.push(Message::system(notice)));
                Submission::Failed(err)
            }
        }
    }
}
