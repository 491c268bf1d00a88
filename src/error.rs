//! Error Handling Module
//!
//! A single error type shared by the transport adapter, the operation poller and
//! the orchestrators. Orchestrators never surface these values raw; they map them
//! to a short user-facing message through [`GenerationError::user_message`].
//!
//! # Example
//!
//! ```rust,ignore
//! use skran::error::{ErrorCategory, GenerationError};
//!
//! let error = GenerationError::api_error(404, "Not found");
//! assert_eq!(error.category(), ErrorCategory::Provider);
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

use crate::types::Modality;

/// Errors produced while talking to the provider or sequencing a generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Empty or whitespace-only input. Orchestrators suppress this silently.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The HTTP layer failed before a response was received.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The provider answered with a non-success status.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// A response could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The provider answered but the payload is unusable (no image, no audio, no media URI).
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// The long-running operation reached a terminal error state.
    #[error("Operation {operation} failed ({code}): {message}")]
    OperationFailed {
        operation: String,
        code: i32,
        message: String,
    },

    /// Fetching the generated binary payload failed.
    #[error("Transport error {status}: {message}")]
    TransportError { status: u16, message: String },

    /// Polling exceeded the configured maximum duration.
    #[error("Operation {operation} did not finish within {elapsed_secs}s")]
    PollTimeout { operation: String, elapsed_secs: u64 },

    /// The caller cancelled the request.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Another request is already in flight on this orchestrator.
    #[error("{0} already has a request in flight")]
    Busy(&'static str),

    /// Local file system failure while saving an artifact.
    #[error("IO error: {0}")]
    IoError(String),
}

/// Coarse classification used for presentation and retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Provider,
    Timeout,
    Cancelled,
    Busy,
    Io,
}

impl GenerationError {
    /// Shorthand for an [`GenerationError::ApiError`] without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Shorthand for an empty-input validation failure.
    pub fn empty_input(what: &str) -> Self {
        Self::ValidationError(format!("{what} must not be empty"))
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError(_) => ErrorCategory::Validation,
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::HttpError(_)
            | Self::ApiError { .. }
            | Self::ParseError(_)
            | Self::ProviderError(_)
            | Self::OperationFailed { .. }
            | Self::TransportError { .. } => ErrorCategory::Provider,
            Self::PollTimeout { .. } => ErrorCategory::Timeout,
            Self::Cancelled(_) => ErrorCategory::Cancelled,
            Self::Busy(_) => ErrorCategory::Busy,
            Self::IoError(_) => ErrorCategory::Io,
        }
    }

    /// HTTP status associated with the error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::TransportError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller-initiated retry could reasonably succeed.
    ///
    /// Nothing in this crate retries automatically; the flag only informs the UI.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(_) | Self::PollTimeout { .. } | Self::Busy(_) => true,
            Self::ApiError { code, .. } | Self::TransportError { status: code, .. } => {
                *code == 429 || *code >= 500
            }
            _ => false,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Short, user-facing message for the given modality. Never contains raw provider text.
    pub fn user_message(&self, modality: Modality) -> &'static str {
        match self.category() {
            ErrorCategory::Cancelled => "The request was cancelled.",
            ErrorCategory::Busy => "Please wait for the current request to finish.",
            ErrorCategory::Configuration => {
                "The service is not configured. Check the API key and try again."
            }
            ErrorCategory::Timeout => {
                "Generation is taking longer than expected. Please try again later."
            }
            _ => match modality {
                Modality::Chat => "Sorry, something went wrong. Please try again.",
                Modality::Image => "The image could not be generated. Please try again.",
                Modality::Video => {
                    "The video could not be generated. The servers may be busy; please wait and try again."
                }
                Modality::Speech => "Something went wrong while generating the audio.",
            },
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::api_error(status.as_u16(), err.to_string()),
            None => Self::HttpError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<base64::DecodeError> for GenerationError {
    fn from(err: base64::DecodeError) -> Self {
        Self::ParseError(format!("invalid base64 payload: {err}"))
    }
}

impl From<std::io::Error> for GenerationError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for GenerationError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigurationError(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_fold_transport_into_provider() {
        let err = GenerationError::TransportError {
            status: 403,
            message: "forbidden".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert_eq!(err.status_code(), Some(403));
        assert!(!err.is_retryable());
    }

    #[test]
    fn server_errors_are_retryable() {
        assert!(GenerationError::api_error(503, "unavailable").is_retryable());
        assert!(GenerationError::api_error(429, "slow down").is_retryable());
        assert!(!GenerationError::api_error(400, "bad").is_retryable());
    }

    #[test]
    fn user_message_hides_provider_text() {
        let err = GenerationError::api_error(500, "internal stack trace here");
        let msg = err.user_message(Modality::Image);
        assert!(!msg.contains("stack trace"));
        assert_eq!(
            msg,
            "The image could not be generated. Please try again."
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: GenerationError = json_err.into();
        assert!(matches!(err, GenerationError::ParseError(_)));
    }
}
