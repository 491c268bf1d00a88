//! Video Generation Capability
//!
//! Video generation is an asynchronous, task-based operation:
//! 1. Submit a generation job and receive an operation handle
//! 2. Poll the handle until the provider marks it done
//! 3. Download the generated media
//!
//! [`crate::operation::OperationPoller`] drives these three steps.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::types::{OperationHandle, VideoRequest};

#[async_trait]
pub trait VideoGenerationCapability: Send + Sync {
    /// Submit a new-scene or extend job.
    async fn submit_video(&self, request: VideoRequest)
    -> Result<OperationHandle, GenerationError>;

    /// Fetch the current status of a previously submitted job.
    async fn poll_operation(
        &self,
        handle: &OperationHandle,
    ) -> Result<OperationHandle, GenerationError>;

    /// Download the media behind a completed operation's URI.
    async fn download_media(&self, uri: &str) -> Result<Vec<u8>, GenerationError>;
}
