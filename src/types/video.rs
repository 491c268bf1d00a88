//! Video Generation Types
//!
//! Requests, long-running operation handles, results and the session history.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ModelSet;

pub const VIDEO_RESOLUTION: &str = "720p";
pub const VIDEO_ASPECT_RATIO: &str = "16:9";

/// Opaque provider-issued reference to a generated clip.
///
/// It is never parsed or rebuilt, only cloned verbatim into the next extend
/// request. Any asset produced by a new-scene or an extend call is a valid
/// input for another extend call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoAsset(serde_json::Value);

impl VideoAsset {
    pub fn from_json(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Whether the next generation starts a new scene or continues the current clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoMode {
    #[default]
    NewScene,
    Extend,
}

/// A video generation submission.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    pub model: String,
    pub prompt: String,
    /// Present only for extend requests
    pub previous: Option<VideoAsset>,
    pub resolution: String,
    pub aspect_ratio: String,
    pub count: u32,
}

impl VideoRequest {
    /// Pick the new-scene or extend variant depending on whether a previous asset is given.
    pub fn for_prompt(
        models: &ModelSet,
        prompt: impl Into<String>,
        previous: Option<VideoAsset>,
    ) -> Self {
        match previous {
            Some(asset) => Self::extend(models, prompt, asset),
            None => Self::new_scene(models, prompt),
        }
    }

    /// New scene on the faster model. 720p keeps the clip extendable later.
    pub fn new_scene(models: &ModelSet, prompt: impl Into<String>) -> Self {
        Self {
            model: models.video_new.clone(),
            prompt: prompt.into(),
            previous: None,
            resolution: VIDEO_RESOLUTION.to_string(),
            aspect_ratio: VIDEO_ASPECT_RATIO.to_string(),
            count: 1,
        }
    }

    /// Continue `asset`; the prompt describes what happens next.
    ///
    /// Resolution and aspect ratio must match the original clip.
    pub fn extend(models: &ModelSet, prompt: impl Into<String>, asset: VideoAsset) -> Self {
        Self {
            model: models.video_extend.clone(),
            prompt: prompt.into(),
            previous: Some(asset),
            resolution: VIDEO_RESOLUTION.to_string(),
            aspect_ratio: VIDEO_ASPECT_RATIO.to_string(),
            count: 1,
        }
    }

    pub fn is_extension(&self) -> bool {
        self.previous.is_some()
    }
}

/// Where a long-running operation stands.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationStatus {
    /// `done` is still false
    Pending,
    /// Done, with a retrievable media reference
    Succeeded { uri: String, asset: VideoAsset },
    /// Done with a provider-reported error
    Failed { code: i32, message: String },
    /// Done, but the response carries no media reference
    MissingMedia,
}

/// Provider-issued handle for an in-flight operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationHandle {
    pub name: String,
    pub status: OperationStatus,
}

impl OperationHandle {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: OperationStatus::Pending,
        }
    }

    pub fn is_done(&self) -> bool {
        !matches!(self.status, OperationStatus::Pending)
    }
}

/// Raw result of a completed video operation.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoClip {
    pub media: Arc<[u8]>,
    pub mime_type: String,
    pub asset: VideoAsset,
}

/// A finished clip kept in the session history.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedVideo {
    pub media: Arc<[u8]>,
    pub mime_type: String,
    pub asset: VideoAsset,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedVideo {
    pub fn from_clip(clip: VideoClip, prompt: impl Into<String>) -> Self {
        Self {
            media: clip.media,
            mime_type: clip.mime_type,
            asset: clip.asset,
            prompt: prompt.into(),
            created_at: Utc::now(),
        }
    }
}

/// Generated clips, most recent first. Unbounded and never deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoHistory {
    entries: VecDeque<GeneratedVideo>,
}

impl VideoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepend(&mut self, video: GeneratedVideo) {
        self.entries.push_front(video);
    }

    pub fn get(&self, index: usize) -> Option<&GeneratedVideo> {
        self.entries.get(index)
    }

    pub fn latest(&self) -> Option<&GeneratedVideo> {
        self.entries.front()
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, GeneratedVideo> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(tag: &str) -> VideoClip {
        VideoClip {
            media: Arc::from(tag.as_bytes()),
            mime_type: "video/mp4".to_string(),
            asset: VideoAsset::from_json(serde_json::json!({ "uri": tag })),
        }
    }

    #[test]
    fn request_branches_on_previous_asset() {
        let models = ModelSet::default();
        let fresh = VideoRequest::for_prompt(&models, "a fox", None);
        assert_eq!(fresh.model, "veo-3.1-fast-generate-preview");
        assert!(!fresh.is_extension());

        let asset = VideoAsset::from_json(serde_json::json!({ "uri": "files/abc" }));
        let ext = VideoRequest::for_prompt(&models, "it runs", Some(asset.clone()));
        assert_eq!(ext.model, "veo-3.1-generate-preview");
        assert_eq!(ext.previous, Some(asset));
        assert_eq!(ext.resolution, fresh.resolution);
        assert_eq!(ext.aspect_ratio, fresh.aspect_ratio);
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut h = VideoHistory::new();
        h.prepend(GeneratedVideo::from_clip(clip("one"), "p1"));
        h.prepend(GeneratedVideo::from_clip(clip("two"), "p2"));
        h.prepend(GeneratedVideo::from_clip(clip("two"), "p2"));
        assert_eq!(h.len(), 3);
        assert_eq!(h.latest().unwrap().prompt, "p2");
        assert_eq!(h.get(2).unwrap().prompt, "p1");
    }

    #[test]
    fn handle_is_done_once_status_is_terminal() {
        let mut handle = OperationHandle::pending("operations/1");
        assert!(!handle.is_done());
        handle.status = OperationStatus::MissingMedia;
        assert!(handle.is_done());
        handle.status = OperationStatus::Failed {
            code: 3,
            message: "rejected".into(),
        };
        assert!(handle.is_done());
    }

    #[test]
    fn asset_serializes_verbatim() {
        let raw = serde_json::json!({ "uri": "x", "mimeType": "video/mp4", "extra": [1, 2] });
        let asset = VideoAsset::from_json(raw.clone());
        assert_eq!(serde_json::to_value(&asset).unwrap(), raw);
    }
}
