//! Image generation types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::InlineImage;

/// Supported output aspect ratios. Passed to the provider verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Classic,
    #[serde(rename = "3:4")]
    ClassicPortrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        Self::Square,
        Self::Landscape,
        Self::Portrait,
        Self::Classic,
        Self::ClassicPortrait,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Classic => "4:3",
            Self::ClassicPortrait => "3:4",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = crate::error::GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| {
                crate::error::GenerationError::ValidationError(format!(
                    "unsupported aspect ratio: {s}"
                ))
            })
    }
}

/// A single image-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
}

/// The current image result, with the prompt that was actually sent.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub image: InlineImage,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedImage {
    pub fn new(image: InlineImage, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
            created_at: Utc::now(),
        }
    }

    /// Preview form of the image.
    pub fn data_url(&self) -> String {
        self.image.to_data_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_round_trip_through_strings() {
        for r in AspectRatio::ALL {
            assert_eq!(r.as_str().parse::<AspectRatio>().unwrap(), r);
            assert_eq!(
                serde_json::to_value(r).unwrap(),
                serde_json::json!(r.as_str())
            );
        }
        assert!("2:1".parse::<AspectRatio>().is_err());
    }
}
