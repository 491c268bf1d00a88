//! Downloadable outputs.
//!
//! File names follow `<prefix>-<created-at millis>.<ext>`. The downloaded bytes
//! are exactly the bytes the preview renders.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::audio::SpeechAudio;
use super::image::GeneratedImage;
use super::video::GeneratedVideo;
use crate::error::Result;

pub const IMAGE_FILE_PREFIX: &str = "skran-art";
pub const VIDEO_FILE_PREFIX: &str = "skran-veo-scene";
pub const SPEECH_FILE_PREFIX: &str = "skran-speech";

#[async_trait]
pub trait Artifact: Sync {
    fn file_prefix(&self) -> &'static str;
    fn extension(&self) -> &'static str;
    fn created_at(&self) -> DateTime<Utc>;

    /// The bytes shown by the preview.
    fn content(&self) -> Cow<'_, [u8]>;

    fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.file_prefix(),
            self.created_at().timestamp_millis(),
            self.extension()
        )
    }

    /// Write the artifact into `dir` and return the full path.
    async fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        tokio::fs::write(&path, self.content()).await?;
        tracing::debug!(path = %path.display(), "artifact saved");
        Ok(path)
    }
}

#[async_trait]
impl Artifact for GeneratedImage {
    fn file_prefix(&self) -> &'static str {
        IMAGE_FILE_PREFIX
    }

    fn extension(&self) -> &'static str {
        "jpg"
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn content(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.image.data)
    }
}

#[async_trait]
impl Artifact for GeneratedVideo {
    fn file_prefix(&self) -> &'static str {
        VIDEO_FILE_PREFIX
    }

    fn extension(&self) -> &'static str {
        "mp4"
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn content(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.media)
    }
}

#[async_trait]
impl Artifact for SpeechAudio {
    fn file_prefix(&self) -> &'static str {
        SPEECH_FILE_PREFIX
    }

    fn extension(&self) -> &'static str {
        "wav"
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn content(&self) -> Cow<'_, [u8]> {
        Cow::Owned(self.to_wav())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::media::InlineImage;
    use chrono::TimeZone;

    #[test]
    fn image_file_name_uses_millis() {
        let mut img = GeneratedImage::new(InlineImage::new("image/jpeg", vec![1]), "p");
        img.created_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(img.file_name(), "skran-art-1700000000123.jpg");
    }
}
