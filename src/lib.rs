//! # Skran - Multi-modal Generation Orchestration
//!
//! Skran sequences chat, image, video and speech generation against the Gemini
//! API and keeps the per-modality session state a front end renders.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Capability Traits**: text, image, video and speech calls sit behind traits, so any provider or test double can back the orchestrators.
//! - **Long-running Operations**: video jobs are submitted, polled at a fixed interval and downloaded, with cancellation and an optional time limit.
//! - **Prompt Enhancement**: image prompts can be rewritten by a text model first, falling back to the original on any failure.
//! - **Clip Extension**: a generated clip's opaque reference is passed back verbatim to continue the scene.
//! - **Single-flight State**: each orchestrator publishes its state on a `watch` channel and rejects overlapping requests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skran::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let studio = Studio::gemini(StudioConfig::from_env()?)?;
//!
//!     studio.image.set_prompt("a lighthouse in a storm");
//!     studio.image.set_aspect_ratio(AspectRatio::Landscape);
//!     if studio.image.generate().await.is_completed()
//!         && let Some(image) = studio.image.snapshot().result
//!     {
//!         image.save_to(std::path::Path::new(".")).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod operation;
pub mod orchestrator;
pub mod providers;
pub mod studio;
pub mod traits;
pub mod types;
pub mod utils;

pub use config::{ModelSet, StudioConfig};
pub use error::{ErrorCategory, GenerationError};
pub use providers::gemini::GeminiClient;
pub use studio::Studio;

/// Commonly used items.
pub mod prelude {
    pub use crate::config::{ModelSet, StudioConfig};
    pub use crate::error::{ErrorCategory, GenerationError};
    pub use crate::observability::{OutputFormat, TracingConfig, init_tracing};
    pub use crate::operation::{OperationPoller, OperationState};
    pub use crate::orchestrator::{
        ChatOrchestrator, ImageOrchestrator, ImagePhase, SpeechOrchestrator, Submission,
        VideoOrchestrator,
    };
    pub use crate::providers::gemini::GeminiClient;
    pub use crate::studio::Studio;
    pub use crate::traits::{
        ImageGenerationCapability, SpeechGenerationCapability, StudioProvider,
        TextGenerationCapability, VideoGenerationCapability,
    };
    pub use crate::types::*;
    pub use crate::utils::CancelHandle;
}
