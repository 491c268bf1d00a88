//! Speech synthesis types.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prebuilt voices offered by the TTS model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VoiceName {
    #[default]
    Kore,
    Puck,
    Fenrir,
    Charon,
    Zephyr,
}

impl VoiceName {
    pub const ALL: [VoiceName; 5] = [
        Self::Kore,
        Self::Puck,
        Self::Fenrir,
        Self::Charon,
        Self::Zephyr,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kore => "Kore",
            Self::Puck => "Puck",
            Self::Fenrir => "Fenrir",
            Self::Charon => "Charon",
            Self::Zephyr => "Zephyr",
        }
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: VoiceName,
}

/// Decoded audio returned by the TTS model.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAudio {
    pub bytes: Arc<[u8]>,
    /// As reported by the provider, e.g. `audio/L16;codec=pcm;rate=24000`
    pub mime_type: String,
    pub voice: VoiceName,
    pub created_at: DateTime<Utc>,
}

const DEFAULT_SAMPLE_RATE: u32 = 24_000;
const SAMPLE_RATE_RANGE: std::ops::RangeInclusive<u32> = 1..=384_000;

impl SpeechAudio {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, voice: VoiceName) -> Self {
        Self {
            bytes: Arc::from(bytes),
            mime_type: mime_type.into(),
            voice,
            created_at: Utc::now(),
        }
    }

    /// Headerless linear PCM (`audio/L16`, `audio/pcm`).
    pub fn is_raw_pcm(&self) -> bool {
        let base = self.mime_type.split(';').next().unwrap_or("").trim();
        base.eq_ignore_ascii_case("audio/l16") || base.eq_ignore_ascii_case("audio/pcm")
    }

    /// Sample rate from the `rate=` MIME parameter. 24 kHz when absent or outside 1 Hz..=384 kHz.
    pub fn sample_rate(&self) -> u32 {
        self.mime_type
            .split(';')
            .filter_map(|p| p.trim().strip_prefix("rate="))
            .find_map(|r| r.trim().parse().ok())
            .filter(|rate| SAMPLE_RATE_RANGE.contains(rate))
            .unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    /// Playable bytes: raw PCM is wrapped in a mono 16-bit WAV header, anything else is returned as is.
    pub fn to_wav(&self) -> Vec<u8> {
        if !self.is_raw_pcm() {
            return self.bytes.to_vec();
        }
        let data_len = u32::try_from(self.bytes.len()).unwrap_or(u32::MAX);
        let sample_rate = self.sample_rate();
        let channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let block_align = channels * bits_per_sample / 8;
        let byte_rate = sample_rate.saturating_mul(u32::from(block_align));

        let mut out = Vec::with_capacity(44 + self.bytes.len());
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36u32.saturating_add(data_len)).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&bits_per_sample.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.extend_from_slice(&self.bytes);
        out
    }
}
