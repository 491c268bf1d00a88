//! Gemini Video Generation (Veo)
//!
//! The REST API uses `models/{model}:predictLongRunning` and returns a long-running
//! operation resource name (e.g. `operations/...`) that must be polled via `GET /{name}`.
//! A finished operation exposes a download URI and a video reference that can be
//! passed back verbatim to extend the clip.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::client::{GeminiClient, PROVIDER_ID};
use super::types::LongRunningOperation;
use crate::error::{GenerationError, Result};
use crate::traits::VideoGenerationCapability;
use crate::types::{OperationHandle, OperationStatus, VideoAsset, VideoRequest};

pub(crate) fn normalize_gemini_model_id(model: &str) -> String {
    let trimmed = model.trim().trim_matches('/');
    if let Some(pos) = trimmed.rfind("/models/") {
        return trimmed[(pos + "/models/".len())..].to_string();
    }
    if let Some(rest) = trimmed.strip_prefix("models/") {
        return rest.to_string();
    }
    trimmed.to_string()
}

fn build_predict_long_running_url(client: &GeminiClient, model: &str) -> String {
    let model = normalize_gemini_model_id(model);
    client.endpoint(&format!("models/{model}:predictLongRunning"))
}

fn build_operation_get_url(client: &GeminiClient, op_name: &str) -> String {
    let trimmed = op_name.trim().trim_start_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_string();
    }
    client.endpoint(trimmed)
}

/// `{"instances": [{prompt, video?}], "parameters": {...}}`
///
/// The previous asset is inserted untouched; extend calls fail if it is rebuilt.
pub(crate) fn build_video_request_body(request: &VideoRequest) -> Value {
    let mut instance = serde_json::Map::new();
    instance.insert("prompt".to_string(), json!(request.prompt));
    if let Some(asset) = &request.previous {
        instance.insert("video".to_string(), asset.as_json().clone());
    }

    json!({
        "instances": [Value::Object(instance)],
        "parameters": {
            "aspectRatio": request.aspect_ratio,
            "resolution": request.resolution,
            "sampleCount": request.count,
        }
    })
}

/// The clip reference of the first generated sample, plus its download URI.
fn extract_video(response: &Value) -> Option<(String, VideoAsset)> {
    for path in [
        "/generateVideoResponse/generatedSamples/0/video",
        "/generatedVideos/0/video",
    ] {
        if let Some(video) = response.pointer(path)
            && let Some(uri) = video.get("uri").and_then(Value::as_str)
        {
            return Some((uri.to_string(), VideoAsset::from_json(video.clone())));
        }
    }

    response
        .pointer("/generateVideoResponse/generatedSamples/0/videoUri")
        .and_then(Value::as_str)
        .map(|uri| (uri.to_string(), VideoAsset::from_json(json!({ "uri": uri }))))
}

pub(crate) fn operation_status(op: &LongRunningOperation) -> OperationStatus {
    if let Some(error) = &op.error {
        return OperationStatus::Failed {
            code: error.code.unwrap_or(-1),
            message: error
                .message
                .clone()
                .unwrap_or_else(|| "Video generation failed".to_string()),
        };
    }
    if !op.done {
        return OperationStatus::Pending;
    }
    match op.response.as_ref().and_then(extract_video) {
        Some((uri, asset)) => OperationStatus::Succeeded { uri, asset },
        None => OperationStatus::MissingMedia,
    }
}

fn to_handle(op: &LongRunningOperation) -> OperationHandle {
    OperationHandle {
        name: op.name.clone(),
        status: operation_status(op),
    }
}

#[async_trait]
impl VideoGenerationCapability for GeminiClient {
    async fn submit_video(&self, request: VideoRequest) -> Result<OperationHandle> {
        if request.prompt.trim().is_empty() {
            return Err(GenerationError::empty_input("prompt"));
        }

        let url = build_predict_long_running_url(self, &request.model);
        let body = build_video_request_body(&request);
        let op: LongRunningOperation = self.post_json(&url, &body).await?;
        if op.name.trim().is_empty() {
            return Err(GenerationError::ProviderError(
                "operation name missing in response".to_string(),
            ));
        }

        tracing::info!(
            provider = PROVIDER_ID,
            operation = %op.name,
            model = %request.model,
            extend = request.is_extension(),
            "video operation submitted"
        );
        Ok(to_handle(&op))
    }

    async fn poll_operation(&self, handle: &OperationHandle) -> Result<OperationHandle> {
        let url = build_operation_get_url(self, &handle.name);
        let op: LongRunningOperation = self.get_json(&url).await?;
        Ok(to_handle(&op))
    }

    async fn download_media(&self, uri: &str) -> Result<Vec<u8>> {
        self.get_bytes(uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSet;

    #[test]
    fn model_ids_are_normalized() {
        assert_eq!(normalize_gemini_model_id("models/veo-3.1"), "veo-3.1");
        assert_eq!(
            normalize_gemini_model_id("projects/p/locations/l/publishers/google/models/veo"),
            "veo"
        );
        assert_eq!(normalize_gemini_model_id(" veo "), "veo");
    }

    #[test]
    fn new_scene_body_has_no_video() {
        let req = VideoRequest::new_scene(&ModelSet::default(), "a storm");
        let body = build_video_request_body(&req);
        assert_eq!(body["instances"][0]["prompt"], "a storm");
        assert!(body["instances"][0].get("video").is_none());
        assert_eq!(body["parameters"]["resolution"], "720p");
        assert_eq!(body["parameters"]["aspectRatio"], "16:9");
        assert_eq!(body["parameters"]["sampleCount"], 1);
    }

    #[test]
    fn extend_body_embeds_asset_verbatim() {
        let raw = json!({ "uri": "https://x/files/abc:download", "mimeType": "video/mp4" });
        let req = VideoRequest::extend(
            &ModelSet::default(),
            "zoom out",
            VideoAsset::from_json(raw.clone()),
        );
        let body = build_video_request_body(&req);
        assert_eq!(body["instances"][0]["video"], raw);
    }

    fn op(value: Value) -> LongRunningOperation {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            operation_status(&op(json!({ "name": "operations/1" }))),
            OperationStatus::Pending
        );

        let done = op(json!({
            "name": "operations/1",
            "done": true,
            "response": { "generateVideoResponse": { "generatedSamples": [
                { "video": { "uri": "https://files/v.mp4" } }
            ] } }
        }));
        match operation_status(&done) {
            OperationStatus::Succeeded { uri, asset } => {
                assert_eq!(uri, "https://files/v.mp4");
                assert_eq!(asset.as_json(), &json!({ "uri": "https://files/v.mp4" }));
            }
            other => panic!("unexpected status: {other:?}"),
        }

        let failed = op(json!({
            "name": "operations/1",
            "done": true,
            "error": { "code": 8, "message": "quota" }
        }));
        assert_eq!(
            operation_status(&failed),
            OperationStatus::Failed {
                code: 8,
                message: "quota".into()
            }
        );

        let empty = op(json!({ "name": "operations/1", "done": true, "response": {} }));
        assert_eq!(operation_status(&empty), OperationStatus::MissingMedia);
    }

    #[test]
    fn bare_video_uri_becomes_an_asset() {
        let response = json!({ "generateVideoResponse": { "generatedSamples": [
            { "videoUri": "https://files/v2.mp4" }
        ] } });
        let (uri, asset) = extract_video(&response).unwrap();
        assert_eq!(uri, "https://files/v2.mp4");
        assert_eq!(asset.as_json()["uri"], "https://files/v2.mp4");
    }
}
