//! Client configuration
//!
//! [`StudioConfig`] carries the credential, endpoint, timeouts, poll schedule and
//! the model identifiers used by each modality.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use validator::Validate;

use crate::error::{GenerationError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Model identifiers for every call the orchestrators issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSet {
    /// Text model used by the prompt enhancer
    pub enhancer: String,
    /// Imagen model used for image generation
    pub image: String,
    /// Veo model used for new scenes
    pub video_new: String,
    /// Veo model used to extend an existing clip
    pub video_extend: String,
    /// TTS model
    pub speech: String,
}

impl Default for ModelSet {
    fn default() -> Self {
        Self {
            enhancer: "gemini-3-pro-preview".to_string(),
            image: "imagen-4.0-generate-001".to_string(),
            video_new: "veo-3.1-fast-generate-preview".to_string(),
            video_extend: "veo-3.1-generate-preview".to_string(),
            speech: "gemini-2.5-flash-preview-tts".to_string(),
        }
    }
}

/// Provider configuration shared read-only by all orchestrators.
#[derive(Debug, Clone, Validate)]
pub struct StudioConfig {
    /// API key for authentication
    pub api_key: SecretString,
    /// Base URL for the Gemini API
    #[validate(url)]
    pub base_url: String,
    /// HTTP timeout in seconds
    #[validate(range(min = 1, max = 3600))]
    pub timeout: u64,
    /// Fixed delay between operation status checks
    pub poll_interval: Duration,
    /// Upper bound for polling; `None` polls until the provider reports a terminal state
    pub max_poll_duration: Option<Duration>,
    pub models: ModelSet,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: SecretString::from(String::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 120,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_duration: None,
            models: ModelSet::default(),
        }
    }
}

impl StudioConfig {
    /// Create a new configuration with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            ..Default::default()
        }
    }

    /// Build a configuration from the environment.
    ///
    /// Reads `GEMINI_API_KEY` (falling back to `API_KEY`), and optionally
    /// `SKRAN_BASE_URL` and `SKRAN_POLL_INTERVAL_SECS`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| {
                GenerationError::ConfigurationError(
                    "GEMINI_API_KEY or API_KEY must be set".to_string(),
                )
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("SKRAN_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(secs) = std::env::var("SKRAN_POLL_INTERVAL_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                GenerationError::ConfigurationError(format!(
                    "SKRAN_POLL_INTERVAL_SECS is not a number: {secs}"
                ))
            })?;
            config.poll_interval = Duration::from_secs(secs);
        }
        config.validate_config()?;
        Ok(config)
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set HTTP timeout in seconds
    pub const fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub const fn with_max_poll_duration(mut self, limit: Option<Duration>) -> Self {
        self.max_poll_duration = limit;
        self
    }

    pub fn with_models(mut self, models: ModelSet) -> Self {
        self.models = models;
        self
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Validate field constraints and the presence of a credential.
    pub fn validate_config(&self) -> Result<()> {
        self.validate()?;
        if self.api_key().trim().is_empty() {
            return Err(GenerationError::ConfigurationError(
                "API key must not be empty".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(GenerationError::ConfigurationError(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_provider_contract() {
        let cfg = StudioConfig::new("k");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert!(cfg.max_poll_duration.is_none());
        assert_eq!(cfg.models.video_new, "veo-3.1-fast-generate-preview");
        assert_eq!(cfg.models.video_extend, "veo-3.1-generate-preview");
        assert!(cfg.validate_config().is_ok());
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = StudioConfig::default().validate_config().unwrap_err();
        assert!(matches!(err, GenerationError::ConfigurationError(_)));
    }

    #[test]
    fn bad_url_is_rejected() {
        let err = StudioConfig::new("k")
            .with_base_url("not a url")
            .validate_config()
            .unwrap_err();
        assert!(matches!(err, GenerationError::ConfigurationError(_)));
    }

    #[test]
    fn debug_output_redacts_key() {
        let cfg = StudioConfig::new("super-secret-key");
        assert!(!format!("{cfg:?}").contains("super-secret-key"));
    }
}
