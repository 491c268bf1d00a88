//! Observability
//!
//! Subscriber setup and helpers for keeping secrets out of log output.
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the embedding application through [`init_tracing`].

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{GenerationError, Result};

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Subscriber configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    pub format: OutputFormat,
    pub with_target: bool,
    pub mask_sensitive_values: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "skran=info".to_string(),
            format: OutputFormat::Text,
            with_target: false,
            mask_sensitive_values: true,
        }
    }
}

impl TracingConfig {
    /// Debug-level output for this crate.
    pub fn verbose() -> Self {
        Self {
            filter: "skran=debug".to_string(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    pub fn with_mask_sensitive_values(mut self, mask: bool) -> Self {
        self.mask_sensitive_values = mask;
        self
    }
}

/// Install a global subscriber. `RUST_LOG` takes precedence over `config.filter`.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    set_mask_sensitive_values(config.mask_sensitive_values);
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.filter))
            .map_err(|e| GenerationError::ConfigurationError(format!("invalid log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        OutputFormat::Text => registry
            .with(fmt::layer().with_target(config.with_target))
            .try_init(),
        OutputFormat::Json => registry
            .with(fmt::layer().json().with_target(config.with_target))
            .try_init(),
    };
    installed.map_err(|e| {
        GenerationError::ConfigurationError(format!("tracing already initialized: {e}"))
    })
}

static MASK_SENSITIVE_VALUES: AtomicBool = AtomicBool::new(true);

pub fn set_mask_sensitive_values(mask: bool) {
    MASK_SENSITIVE_VALUES.store(mask, Ordering::Relaxed);
}

pub fn get_mask_sensitive_values() -> bool {
    MASK_SENSITIVE_VALUES.load(Ordering::Relaxed)
}

/// Shorten a credential to its first and last characters.
pub fn mask_sensitive_value(value: &str) -> String {
    if !get_mask_sensitive_values() {
        return value.to_string();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

/// Mask the `key` query parameter of a URL.
pub fn mask_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let masked: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) if k.eq_ignore_ascii_case("key") => {
                format!("{k}={}", mask_sensitive_value(v))
            }
            _ => pair.to_string(),
        })
        .collect();
    format!("{base}?{}", masked.join("&"))
}
