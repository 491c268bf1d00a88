//! Chat types: messages, conversation history and the model menu.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::InlineImage;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
}

/// A single conversation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
            image: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn with_image(mut self, image: Option<InlineImage>) -> Self {
        self.image = image;
        self
    }
}

/// Ordered, append-only message log. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Entries of the chat model menu.
///
/// `Gpt51Preview` is a display label only: it resolves to the same backend
/// model as `Gemini3Pro`. This is product behaviour, kept as an explicit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChatModel {
    #[default]
    Gemini3Pro,
    Gemini25Flash,
    Gpt51Preview,
}

/// `(menu entry, display name, backend model id)`
static MODEL_TABLE: [(ChatModel, &str, &str); 3] = [
    (ChatModel::Gemini3Pro, "Gemini 3 Pro", "gemini-3-pro-preview"),
    (ChatModel::Gemini25Flash, "Gemini 2.5 Flash", "gemini-2.5-flash"),
    (ChatModel::Gpt51Preview, "GPT-5.1 (Preview)", "gemini-3-pro-preview"),
];

impl ChatModel {
    pub const ALL: [ChatModel; 3] = [Self::Gemini3Pro, Self::Gemini25Flash, Self::Gpt51Preview];

    fn entry(&self) -> &'static (ChatModel, &'static str, &'static str) {
        // The table lists every variant, so the fallback is never reached.
        MODEL_TABLE
            .iter()
            .find(|(m, _, _)| m == self)
            .unwrap_or(&MODEL_TABLE[0])
    }

    pub fn display_name(&self) -> &'static str {
        self.entry().1
    }

    /// The model id actually sent to the provider.
    pub fn backend_model_id(&self) -> &'static str {
        self.entry().2
    }

    pub fn is_alias(&self) -> bool {
        Self::ALL
            .iter()
            .take_while(|m| *m != self)
            .any(|m| m.backend_model_id() == self.backend_model_id())
    }
}

/// A text-generation call: prompt, optional attached image and backend model id.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub model: String,
}

impl TextRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            model: model.into(),
        }
    }

    pub fn with_image(mut self, image: Option<InlineImage>) -> Self {
        self.image = image;
        self
    }
}

/// Outcome of a successful text call. An answer without text is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextReply {
    Text(String),
    Empty,
}

impl TextReply {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Empty => None,
        }
    }
}
