//! Resilient streaming transcription client.
//!
//! Session requests, transport error classification, the caller behavior
//! contract, the service seam, and the retry driver that owns the session
//! lifecycle.

pub mod behavior;
pub mod classify;
pub mod client;
pub mod request;
pub mod service;

pub use behavior::{EventRelay, TranscriptionBehavior};
pub use classify::{RetryPolicy, TranscribeError, TransportErrorKind};
pub use client::RetryClient;
pub use request::{MediaEncoding, SessionRequest};
pub use service::{
    AudioStream, ChunkPublisher, SessionResponse, TranscribeService, TranscriptEvent,
};
