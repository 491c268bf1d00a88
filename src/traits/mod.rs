//! Capability traits
//!
//! The four calls the transport adapter offers. Orchestrators depend on these
//! traits rather than on a concrete client, so any provider (or a test double)
//! can sit behind them.

mod image;
mod speech;
mod text;
mod video;

pub use image::ImageGenerationCapability;
pub use speech::SpeechGenerationCapability;
pub use text::TextGenerationCapability;
pub use video::VideoGenerationCapability;

/// Everything the studio needs from one provider.
pub trait StudioProvider:
    TextGenerationCapability
    + ImageGenerationCapability
    + VideoGenerationCapability
    + SpeechGenerationCapability
{
}

impl<T> StudioProvider for T where
    T: TextGenerationCapability
        + ImageGenerationCapability
        + VideoGenerationCapability
        + SpeechGenerationCapability
{
}
