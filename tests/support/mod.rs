//! In-process provider double shared by the orchestrator tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use skran::prelude::*;
use tokio::sync::Notify;

/// Records every request and answers from scripted queues.
///
/// Unscripted calls succeed with canned values. When `gate` is set every call
/// waits for a notification before answering.
#[derive(Default)]
pub struct MockStudio {
    pub gate: Option<Arc<Notify>>,
    pub text_requests: Mutex<Vec<TextRequest>>,
    pub text_replies: Mutex<VecDeque<Result<TextReply, GenerationError>>>,
    pub image_requests: Mutex<Vec<ImageRequest>>,
    pub image_failures: Mutex<VecDeque<GenerationError>>,
    pub speech_requests: Mutex<Vec<SpeechRequest>>,
    pub speech_failures: Mutex<VecDeque<GenerationError>>,
    pub video_requests: Mutex<Vec<VideoRequest>>,
    pub video_failures: Mutex<VecDeque<GenerationError>>,
    /// Operations never finish when set
    pub video_never_done: bool,
    video_counter: AtomicU32,
}

impl MockStudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn never_done() -> Self {
        Self {
            video_never_done: true,
            ..Self::default()
        }
    }

    pub fn reply_with(self, reply: Result<TextReply, GenerationError>) -> Self {
        self.text_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn text_requests(&self) -> Vec<TextRequest> {
        self.text_requests.lock().unwrap().clone()
    }

    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_requests.lock().unwrap().clone()
    }

    pub fn video_requests(&self) -> Vec<VideoRequest> {
        self.video_requests.lock().unwrap().clone()
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

pub fn image_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46]
}

pub fn clip_asset(n: u32) -> VideoAsset {
    VideoAsset::from_json(json!({ "uri": format!("mock://clip-{n}"), "mimeType": "video/mp4" }))
}

#[async_trait]
impl TextGenerationCapability for MockStudio {
    async fn generate_text(&self, request: TextRequest) -> Result<TextReply, GenerationError> {
        self.text_requests.lock().unwrap().push(request);
        self.wait_gate().await;
        self.text_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(TextReply::Text("mock reply".into())))
    }
}

#[async_trait]
impl ImageGenerationCapability for MockStudio {
    async fn generate_image(&self, request: ImageRequest) -> Result<InlineImage, GenerationError> {
        self.image_requests.lock().unwrap().push(request);
        self.wait_gate().await;
        if let Some(err) = self.image_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(InlineImage::new("image/jpeg", image_bytes()))
    }
}

#[async_trait]
impl SpeechGenerationCapability for MockStudio {
    async fn generate_speech(&self, request: SpeechRequest) -> Result<SpeechAudio, GenerationError> {
        self.speech_requests.lock().unwrap().push(request.clone());
        self.wait_gate().await;
        if let Some(err) = self.speech_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        // The provider double deliberately reports the default voice.
        Ok(SpeechAudio::new(
            request.text.into_bytes(),
            "audio/L16;codec=pcm;rate=24000",
            VoiceName::default(),
        ))
    }
}

#[async_trait]
impl VideoGenerationCapability for MockStudio {
    async fn submit_video(&self, request: VideoRequest) -> Result<OperationHandle, GenerationError> {
        self.video_requests.lock().unwrap().push(request);
        self.wait_gate().await;
        if let Some(err) = self.video_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        let n = self.video_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let name = format!("operations/{n}");
        if self.video_never_done {
            return Ok(OperationHandle::pending(name));
        }
        Ok(OperationHandle {
            name,
            status: OperationStatus::Succeeded {
                uri: format!("mock://clip-{n}"),
                asset: clip_asset(n),
            },
        })
    }

    async fn poll_operation(
        &self,
        handle: &OperationHandle,
    ) -> Result<OperationHandle, GenerationError> {
        Ok(handle.clone())
    }

    async fn download_media(&self, uri: &str) -> Result<Vec<u8>, GenerationError> {
        Ok(uri.as_bytes().to_vec())
    }
}
