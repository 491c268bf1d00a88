//! Orchestrators
//!
//! One orchestrator per modality. Each owns its state exclusively and publishes
//! it through a `tokio::sync::watch` channel: the rendering layer reads
//! [`snapshot`](ChatOrchestrator::snapshot)s or awaits changes on a
//! [`subscribe`](ChatOrchestrator::subscribe)d receiver, and forwards user
//! intents as method calls.
//!
//! Every orchestrator is single-flight. While a request is in flight its
//! `pending` flag is set, and a second submission is rejected without touching
//! state. Errors never escape an orchestrator: they become a user-facing
//! message (or a system chat entry) and a `warn` log line.

use tokio::sync::watch;

use crate::error::GenerationError;

pub mod chat;
pub mod enhance;
pub mod image;
pub mod speech;
pub mod video;

pub use chat::{ChatOrchestrator, ChatState};
pub use enhance::PromptEnhancer;
pub use image::{ImageOrchestrator, ImagePhase, ImageState};
pub use speech::{SpeechOrchestrator, SpeechState};
pub use video::{EXTEND_PROMPT_HINT, VideoOrchestrator, VideoState};

/// Outcome of a `submit`/`generate` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Empty input; nothing was sent and nothing changed.
    Skipped,
    /// Another request was in flight; nothing was sent and nothing changed.
    Rejected,
    /// The provider call succeeded and the result is in state.
    Completed,
    /// The provider call failed; state carries the user-facing notice.
    Failed(GenerationError),
}

impl Submission {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Error category equivalent, for callers that prefer `Result`.
    pub fn into_result(self) -> Result<(), GenerationError> {
        match self {
            Self::Completed => Ok(()),
            Self::Skipped => Err(GenerationError::empty_input("input")),
            Self::Rejected => Err(GenerationError::Busy("orchestrator")),
            Self::Failed(err) => Err(err),
        }
    }
}

/// State types that carry an in-flight flag.
pub(crate) trait Pending {
    fn is_pending(&self) -> bool;
    fn set_pending(&mut self, pending: bool);
}

/// Holds the `pending` flag for the lifetime of one request.
///
/// The flag is cleared on drop, so a cancelled or dropped future releases it too.
pub(crate) struct PendingPermit<'a, S: Pending> {
    state: &'a watch::Sender<S>,
}

pub(crate) enum Admission<'a, S: Pending, T> {
    Busy,
    Skip,
    Admit(PendingPermit<'a, S>, T),
}

impl<'a, S: Pending> PendingPermit<'a, S> {
    /// Atomically check the flag, run `prepare` and set the flag.
    ///
    /// `prepare` returns `None` for empty input and must not mutate state in that case.
    pub(crate) fn admit<T>(
        state: &'a watch::Sender<S>,
        prepare: impl FnOnce(&mut S) -> Option<T>,
    ) -> Admission<'a, S, T> {
        let mut outcome = None;
        let mut busy = false;
        state.send_if_modified(|s| {
            if s.is_pending() {
                busy = true;
                return false;
            }
            match prepare(s) {
                Some(value) => {
                    s.set_pending(true);
                    outcome = Some(value);
                    true
                }
                None => false,
            }
        });

        match outcome {
            Some(value) => Admission::Admit(Self { state }, value),
            None if busy => Admission::Busy,
            None => Admission::Skip,
        }
    }
}

impl<S: Pending> Drop for PendingPermit<'_, S> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            let was = s.is_pending();
            s.set_pending(false);
            was
        });
    }
}

macro_rules! impl_pending {
    ($($state:ty),+ $(,)?) => {
        $(impl Pending for $state {
            fn is_pending(&self) -> bool {
                self.pending
            }

            fn set_pending(&mut self, pending: bool) {
                self.pending = pending;
            }
        })+
    };
}

impl_pending!(ChatState, ImageState, VideoState, SpeechState);
