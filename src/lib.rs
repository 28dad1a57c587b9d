//! streamscribe - Relays fragmented media streams into a live transcription session
//!
//! Pulls frames out of a lazily-produced sequence of media fragments,
//! assembles them into byte chunks, and feeds them into a long-lived
//! bidirectional speech-to-text session that transparently survives
//! transient failures by retrying with a fresh session id.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod config;
pub mod defaults;
pub mod error;
pub mod extractor;
pub mod fragment;
pub mod metrics;
pub mod relay;
pub mod transcribe;

// Core seams (source → extract → relay → sink)
pub use fragment::reader::FragmentSource;
pub use fragment::stop::StopSignal;
pub use fragment::visitor::{ElementVisitor, FragmentTracker};
pub use transcribe::behavior::TranscriptionBehavior;
pub use transcribe::service::{ChunkPublisher, TranscribeService};

// Session driving
pub use relay::FragmentRelay;
pub use transcribe::client::RetryClient;
pub use transcribe::request::{MediaEncoding, SessionRequest};

// Error handling
pub use error::{Result, StreamscribeError};

// Config
pub use config::Config;

// Metrics
pub use metrics::{LogMetrics, MetricsSink};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }
}
