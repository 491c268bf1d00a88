//! Gemini Client Implementation
//!
//! Main client structure shared by all Gemini capabilities. It owns the HTTP
//! client and the credential; capability impls live in sibling modules.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client as HttpClient;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::ErrorEnvelope;
use crate::config::StudioConfig;
use crate::error::{GenerationError, Result};
use crate::observability::mask_url;
use crate::operation::OperationPoller;
use crate::types::{VideoAsset, VideoClip, VideoRequest};
use crate::utils::CancelHandle;

pub(crate) const PROVIDER_ID: &str = "gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini client implementing every capability trait.
///
/// Cloning is cheap; the configuration is shared behind an `Arc` and never mutated.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    config: Arc<StudioConfig>,
}

static_assertions::assert_impl_all!(GeminiClient: Send, Sync, Clone);

impl GeminiClient {
    /// Create a new Gemini client with the given configuration
    pub fn new(config: StudioConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| {
                GenerationError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
            })?;

        Self::with_http_client(config, http_client)
    }

    /// Create a new Gemini client with a custom HTTP client
    pub fn with_http_client(config: StudioConfig, http_client: HttpClient) -> Result<Self> {
        config.validate_config()?;
        Ok(Self {
            http_client,
            config: Arc::new(config),
        })
    }

    /// Create a client from `GEMINI_API_KEY` and related variables.
    pub fn from_env() -> Result<Self> {
        Self::new(StudioConfig::from_env()?)
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Submit, poll and download a clip in one call.
    ///
    /// With `previous` set the clip extends that asset, otherwise a new scene is generated.
    pub async fn generate_video(
        &self,
        prompt: &str,
        previous: Option<VideoAsset>,
        cancel: &CancelHandle,
    ) -> Result<VideoClip> {
        let request = VideoRequest::for_prompt(&self.config.models, prompt, previous);
        OperationPoller::from_config(self, &self.config)
            .with_cancel(cancel.clone())
            .run(request)
            .await
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        crate::utils::url::join_url(&self.config.base_url, path)
    }

    pub(crate) async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let builder = self.http_client.post(url).json(body);
        let response = self.send("POST", url, builder).await?;
        Ok(response.json::<R>().await?)
    }

    pub(crate) async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        let builder = self.http_client.get(url);
        let response = self.send("GET", url, builder).await?;
        Ok(response.json::<R>().await?)
    }

    /// Fetch a binary payload. The credential travels both as header and as
    /// the `key` query parameter, which media download URIs require.
    pub(crate) async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let start = Instant::now();
        tracing::debug!(provider = PROVIDER_ID, url = %mask_url(url), "Download started");
        let response = self
            .http_client
            .get(url)
            .query(&[("key", self.config.api_key())])
            .header(API_KEY_HEADER, self.config.api_key())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(provider = PROVIDER_ID, status = status.as_u16(), "Download failed");
            return Err(GenerationError::TransportError {
                status: status.as_u16(),
                message: if message.is_empty() {
                    "media download failed".to_string()
                } else {
                    message
                },
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!(
            provider = PROVIDER_ID,
            bytes = bytes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Download completed"
        );
        Ok(bytes.to_vec())
    }

    async fn send(
        &self,
        method: &str,
        url: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let start = Instant::now();
        tracing::debug!(provider = PROVIDER_ID, method = %method, url = %mask_url(url), "Request started");

        let response = builder
            .header(API_KEY_HEADER, self.config.api_key())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                provider = PROVIDER_ID,
                status_code = status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Request completed successfully"
            );
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            provider = PROVIDER_ID,
            status_code = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request failed"
        );
        Err(api_error_from_body(status.as_u16(), &body))
    }
}

/// Map a non-success response body onto an `ApiError`, preferring the
/// provider's own message from the Google error envelope.
pub(crate) fn api_error_from_body(status: u16, body: &str) -> GenerationError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => GenerationError::ApiError {
            code: envelope.error.code.unwrap_or(status),
            message: envelope
                .error
                .message
                .unwrap_or_else(|| format!("HTTP {status}")),
            details: serde_json::from_str(body).ok(),
        },
        Err(_) => GenerationError::ApiError {
            code: status,
            message: if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.to_string()
            },
            details: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_requires_api_key() {
        let err = GeminiClient::new(StudioConfig::default()).unwrap_err();
        assert!(matches!(err, GenerationError::ConfigurationError(_)));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client =
            GeminiClient::new(StudioConfig::new("k").with_base_url("http://localhost:1/v1beta/"))
                .unwrap();
        assert_eq!(
            client.endpoint("models/x:predict"),
            "http://localhost:1/v1beta/models/x:predict"
        );
    }

    #[test]
    fn error_envelope_is_parsed() {
        let err = api_error_from_body(
            400,
            r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#,
        );
        match err {
            GenerationError::ApiError {
                code,
                message,
                details,
            } => {
                assert_eq!(code, 400);
                assert_eq!(message, "API key not valid");
                assert!(details.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn plain_text_error_body_is_kept() {
        let err = api_error_from_body(502, "bad gateway");
        assert_eq!(err, GenerationError::api_error(502, "bad gateway"));
    }
}
