use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::defaults;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub stream: StreamConfig,
    pub retry: RetryConfig,
}

/// Outbound stream configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    pub language: String,
    pub sample_rate_hz: u32,
    pub frames_per_chunk: usize,
}

/// Retry behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    pub delay_ms: u64,
    /// Maximum session attempts per call chain; 0 means unbounded.
    pub max_attempts: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            sample_rate_hz: defaults::SAMPLE_RATE_HZ,
            frames_per_chunk: defaults::FRAMES_PER_CHUNK,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay_ms: defaults::RETRY_DELAY_MS,
            max_attempts: defaults::MAX_ATTEMPTS,
        }
    }
}

impl RetryConfig {
    /// Attempt bound as the retry client expects it.
    pub fn attempt_bound(&self) -> Option<u32> {
        if self.max_attempts == 0 {
            None
        } else {
            Some(self.max_attempts)
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - STREAMSCRIBE_LANGUAGE → stream.language
    /// - STREAMSCRIBE_SAMPLE_RATE → stream.sample_rate_hz
    /// - STREAMSCRIBE_RETRY_DELAY_MS → retry.delay_ms
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(language) = std::env::var("STREAMSCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.stream.language = language;
        }

        if let Ok(rate) = std::env::var("STREAMSCRIBE_SAMPLE_RATE")
            && let Ok(rate) = rate.parse()
        {
            self.stream.sample_rate_hz = rate;
        }

        if let Ok(delay) = std::env::var("STREAMSCRIBE_RETRY_DELAY_MS")
            && let Ok(delay) = delay.parse()
        {
            self.retry.delay_ms = delay;
        }

        self
    }
}
