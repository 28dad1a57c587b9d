//! Default configuration constants for streamscribe.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Default audio sample rate in Hz.
///
/// 8kHz matches telephony-grade media streams, the most common source
/// feeding a live transcription session.
pub const SAMPLE_RATE_HZ: u32 = 8000;

/// Default language code for transcription requests.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default number of frames concatenated into one outbound chunk.
///
/// Each simple-block frame from the source is roughly 1 KiB of audio, so
/// this yields chunks sized for a streaming API without long buffering gaps.
pub const FRAMES_PER_CHUNK: usize = 4;

/// Default delay between retry attempts in milliseconds.
///
/// Long enough to ride out a transient service hiccup, short enough that
/// the session resumes before the source buffers meaningfully.
pub const RETRY_DELAY_MS: u64 = 500;

/// Default maximum number of session attempts per call chain.
///
/// A bound keeps a permanently broken sink from retrying forever. Set
/// `retry.max_attempts = 0` in the config to retry without bound.
pub const MAX_ATTEMPTS: u32 = 8;

/// Metric name recorded once per completed call chain.
///
/// Value 0 means the session completed, 1 means it failed terminally.
pub const STREAM_OUTCOME_METRIC: &str = "transcribe_stream_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_defaults_are_sane() {
        assert!(RETRY_DELAY_MS > 0);
        assert!(MAX_ATTEMPTS > 1, "a single attempt would never retry");
    }

    #[test]
    fn frames_per_chunk_is_positive() {
        assert!(FRAMES_PER_CHUNK > 0);
    }
}
