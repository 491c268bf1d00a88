//! Long-running operation poller
//!
//! Drives a video job from submission to downloaded media:
//!
//! ```text
//! Submitted -> Polling -> Done
//!                 |   \-> Failed
//!                 \-----> Cancelled
//! ```
//!
//! Polling waits a fixed interval between status checks and never grows it.
//! There is no attempt limit; the loop ends when the provider reports a terminal
//! state, when the caller cancels, or when the optional maximum duration elapses.

use std::time::Duration;

use backoff::backoff::{Backoff, Constant};
use tokio::time::Instant;

use crate::config::StudioConfig;
use crate::error::{GenerationError, Result};
use crate::traits::VideoGenerationCapability;
use crate::types::{OperationHandle, OperationStatus, VideoAsset, VideoClip, VideoRequest};
use crate::utils::CancelHandle;

const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// Where the poller currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    Submitted,
    Polling { operation: String, attempt: u32 },
    Done,
    Failed,
    Cancelled,
}

impl OperationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }
}

/// Polls a submitted video operation until it resolves.
pub struct OperationPoller<'a, P: ?Sized> {
    provider: &'a P,
    interval: Duration,
    schedule: Constant,
    max_poll_duration: Option<Duration>,
    cancel: CancelHandle,
    state: OperationState,
}

impl<'a, P> OperationPoller<'a, P>
where
    P: VideoGenerationCapability + ?Sized,
{
    pub fn new(provider: &'a P, interval: Duration) -> Self {
        Self {
            provider,
            interval,
            schedule: Constant::new(interval),
            max_poll_duration: None,
            cancel: CancelHandle::default(),
            state: OperationState::Submitted,
        }
    }

    /// Use the poll interval and maximum duration from `config`.
    pub fn from_config(provider: &'a P, config: &StudioConfig) -> Self {
        Self::new(provider, config.poll_interval).with_max_duration(config.max_poll_duration)
    }

    pub fn with_max_duration(mut self, limit: Option<Duration>) -> Self {
        self.max_poll_duration = limit;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> &OperationState {
        &self.state
    }

    /// Submit `request`, wait for the operation and download its media.
    pub async fn run(&mut self, request: VideoRequest) -> Result<VideoClip> {
        self.state = OperationState::Submitted;
        let result = self.drive(request).await;
        self.state = match &result {
            Ok(_) => OperationState::Done,
            Err(GenerationError::Cancelled(_)) => OperationState::Cancelled,
            Err(_) => OperationState::Failed,
        };
        result
    }

    async fn drive(&mut self, request: VideoRequest) -> Result<VideoClip> {
        self.check_cancelled("before submission")?;
        let provider = self.provider;
        let cancel = self.cancel.clone();

        let mut handle = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled("during submission")),
            submitted = provider.submit_video(request) => submitted?,
        };

        let started = Instant::now();
        let mut attempt: u32 = 0;
        let (uri, asset) = loop {
            if let Some(done) = resolve(&handle)? {
                break done;
            }

            self.state = OperationState::Polling {
                operation: handle.name.clone(),
                attempt,
            };
            self.check_cancelled(&handle.name)?;
            if let Some(limit) = self.max_poll_duration
                && started.elapsed() >= limit
            {
                tracing::warn!(operation = %handle.name, attempts = attempt, "poll limit reached");
                return Err(GenerationError::PollTimeout {
                    operation: handle.name.clone(),
                    elapsed_secs: started.elapsed().as_secs(),
                });
            }

            let delay = self.schedule.next_backoff().unwrap_or(self.interval);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(&handle.name)),
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
            handle = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(&handle.name)),
                polled = provider.poll_operation(&handle) => polled?,
            };
            tracing::debug!(operation = %handle.name, attempt, done = handle.is_done(), "polled operation");
        };

        tracing::debug!(operation = %handle.name, attempts = attempt, "operation done, downloading");
        let media = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(&handle.name)),
            bytes = provider.download_media(&uri) => bytes?,
        };

        let mime_type =
            crate::utils::mime::guess_mime(Some(media.as_slice()), Some(&uri), DEFAULT_VIDEO_MIME);
        Ok(VideoClip {
            media: media.into(),
            mime_type,
            asset,
        })
    }

    fn check_cancelled(&self, operation: &str) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(cancelled(operation));
        }
        Ok(())
    }
}

fn cancelled(operation: &str) -> GenerationError {
    GenerationError::Cancelled(format!("video generation cancelled ({operation})"))
}

/// `Ok(None)` while pending; a terminal error status ends polling at once.
fn resolve(handle: &OperationHandle) -> Result<Option<(String, VideoAsset)>> {
    match &handle.status {
        OperationStatus::Pending => Ok(None),
        OperationStatus::Succeeded { uri, asset } => Ok(Some((uri.clone(), asset.clone()))),
        OperationStatus::Failed { code, message } => Err(GenerationError::OperationFailed {
            operation: handle.name.clone(),
            code: *code,
            message: message.clone(),
        }),
        OperationStatus::MissingMedia => Err(GenerationError::ProviderError(format!(
            "operation {} finished without a video URI",
            handle.name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSet;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Reports pending `pending_polls` times, then `final_status`.
    struct ScriptedVideo {
        pending_polls: u32,
        final_status: OperationStatus,
        polls: AtomicU32,
        poll_times: Mutex<Vec<Instant>>,
    }

    impl ScriptedVideo {
        fn new(pending_polls: u32, final_status: OperationStatus) -> Self {
            Self {
                pending_polls,
                final_status,
                polls: AtomicU32::new(0),
                poll_times: Mutex::new(Vec::new()),
            }
        }

        fn success(pending_polls: u32) -> Self {
            Self::new(
                pending_polls,
                OperationStatus::Succeeded {
                    uri: "https://files/clip.mp4".into(),
                    asset: VideoAsset::from_json(serde_json::json!({ "uri": "https://files/clip.mp4" })),
                },
            )
        }
    }

    #[async_trait]
    impl VideoGenerationCapability for ScriptedVideo {
        async fn submit_video(&self, _request: VideoRequest) -> Result<OperationHandle> {
            self.poll_times.lock().unwrap().push(Instant::now());
            Ok(OperationHandle::pending("operations/test"))
        }

        async fn poll_operation(&self, handle: &OperationHandle) -> Result<OperationHandle> {
            self.poll_times.lock().unwrap().push(Instant::now());
            let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            let status = if n > self.pending_polls {
                self.final_status.clone()
            } else {
                OperationStatus::Pending
            };
            Ok(OperationHandle {
                name: handle.name.clone(),
                status,
            })
        }

        async fn download_media(&self, _uri: &str) -> Result<Vec<u8>> {
            Ok(vec![0, 0, 0, 0x18, b'f', b't', b'y', b'p', b'm', b'p', b'4', b'2'])
        }
    }

    fn request() -> VideoRequest {
        VideoRequest::new_scene(&ModelSet::default(), "a wave")
    }

    #[tokio::test(start_paused = true)]
    async fn waits_exactly_the_interval_between_polls() {
        let provider = ScriptedVideo::success(3);
        let interval = Duration::from_secs(5);
        let mut poller = OperationPoller::new(&provider, interval);

        let clip = poller.run(request()).await.unwrap();
        assert_eq!(poller.state(), &OperationState::Done);
        assert_eq!(clip.asset.as_json()["uri"], "https://files/clip.mp4");

        let times = provider.poll_times.lock().unwrap().clone();
        assert_eq!(times.len(), 5);
        for pair in times.windows(2) {
            assert_eq!(pair[1] - pair[0], interval);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn done_without_uri_fails_without_more_polls() {
        let provider = ScriptedVideo::new(1, OperationStatus::MissingMedia);
        let mut poller = OperationPoller::new(&provider, Duration::from_secs(5));

        let err = poller.run(request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::ProviderError(_)));
        assert_eq!(poller.state(), &OperationState::Failed);
        assert_eq!(provider.polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn operation_error_is_kept() {
        let provider = ScriptedVideo::new(
            0,
            OperationStatus::Failed {
                code: 13,
                message: "internal".into(),
            },
        );
        let mut poller = OperationPoller::new(&provider, Duration::from_secs(5));

        let err = poller.run(request()).await.unwrap_err();
        assert_eq!(
            err,
            GenerationError::OperationFailed {
                operation: "operations/test".into(),
                code: 13,
                message: "internal".into()
            }
        );
        assert_eq!(provider.polls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_ends_polling() {
        let provider = ScriptedVideo::success(u32::MAX);
        let cancel = CancelHandle::default();
        let mut poller =
            OperationPoller::new(&provider, Duration::from_secs(5)).with_cancel(cancel.clone());

        let run = poller.run(request());
        let canceller = async {
            tokio::time::sleep(Duration::from_secs(12)).await;
            cancel.cancel();
        };
        let (result, ()) = tokio::join!(run, canceller);

        assert!(matches!(result, Err(GenerationError::Cancelled(_))));
        assert_eq!(poller.state(), &OperationState::Cancelled);
        assert_eq!(provider.polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn max_duration_times_out() {
        let provider = ScriptedVideo::success(u32::MAX);
        let mut poller = OperationPoller::new(&provider, Duration::from_secs(5))
            .with_max_duration(Some(Duration::from_secs(20)));

        let err = poller.run(request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::PollTimeout { elapsed_secs: 20, .. }));
        assert_eq!(provider.polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn already_cancelled_never_submits() {
        let provider = ScriptedVideo::success(0);
        let cancel = CancelHandle::default();
        cancel.cancel();
        let mut poller =
            OperationPoller::new(&provider, Duration::from_secs(5)).with_cancel(cancel);

        assert!(matches!(
            poller.run(request()).await,
            Err(GenerationError::Cancelled(_))
        ));
        assert!(provider.poll_times.lock().unwrap().is_empty());
    }
}
