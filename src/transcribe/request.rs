//! Session request descriptor.

use uuid::Uuid;

use crate::defaults;

/// Audio encoding accepted by the transcription sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEncoding {
    /// Signed 16-bit little-endian PCM.
    Pcm,
    /// Ogg-encapsulated Opus.
    OggOpus,
    /// FLAC.
    Flac,
}

impl MediaEncoding {
    /// Wire name of the encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaEncoding::Pcm => "pcm",
            MediaEncoding::OggOpus => "ogg-opus",
            MediaEncoding::Flac => "flac",
        }
    }
}

/// Immutable descriptor for one streaming transcription session.
///
/// A retry rebuilds the request with a fresh session id; language, encoding
/// and sample rate are preserved verbatim across attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub language: String,
    pub encoding: MediaEncoding,
    pub sample_rate_hz: u32,
    pub session_id: String,
}

impl SessionRequest {
    /// Creates a request with a freshly generated session id.
    pub fn new(language: impl Into<String>, encoding: MediaEncoding, sample_rate_hz: u32) -> Self {
        Self {
            language: language.into(),
            encoding,
            sample_rate_hz,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Returns a copy with a new globally unique session id and all other
    /// fields unchanged.
    pub fn with_new_session_id(&self) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            ..self.clone()
        }
    }
}

impl Default for SessionRequest {
    fn default() -> Self {
        Self::new(
            defaults::DEFAULT_LANGUAGE,
            MediaEncoding::Pcm,
            defaults::SAMPLE_RATE_HZ,
        )
    }
}
