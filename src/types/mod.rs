//! Core Types
//!
//! Requests, results and session state for the four generation modalities.

pub mod artifact;
pub mod audio;
pub mod chat;
pub mod image;
pub mod media;
pub mod video;

pub use artifact::Artifact;
pub use audio::{SpeechAudio, SpeechRequest, VoiceName};
pub use chat::{ChatModel, ConversationHistory, Message, Role, TextReply, TextRequest};
pub use image::{AspectRatio, GeneratedImage, ImageRequest};
pub use media::InlineImage;
pub use video::{
    GeneratedVideo, OperationHandle, OperationStatus, VideoAsset, VideoClip, VideoHistory,
    VideoMode, VideoRequest,
};

use serde::{Deserialize, Serialize};

/// The independent media modalities. Each one has its own orchestrator and state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Chat,
    Image,
    Video,
    Speech,
}

impl Modality {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Image => "image",
            Self::Video => "video",
            Self::Speech => "speech",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
