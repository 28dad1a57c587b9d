//! Streaming sink collaborator seam.
//!
//! The service accepts a session request plus an outbound chunk stream,
//! delivers zero or more inbound notifications through the event relay, and
//! then resolves exactly one outcome for the attempt.

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;

use crate::error::StreamscribeError;
use crate::transcribe::behavior::EventRelay;
use crate::transcribe::classify::TranscribeError;
use crate::transcribe::request::SessionRequest;

/// Outbound audio: a stream of contiguous byte chunks.
pub type AudioStream = BoxStream<'static, Vec<u8>>;

/// Stream metadata delivered when an attempt is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    /// Session id echoed back by the service.
    pub session_id: String,
    /// Service-assigned request id, when available.
    pub request_id: Option<String>,
}

/// One incremental transcription result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEvent {
    /// Transcript text for the segment.
    pub transcript: String,
    /// True while the segment is still being revised.
    pub is_partial: bool,
}

/// Source of the outbound chunk stream.
///
/// Subscribed once per attempt. The same publisher is reused across retries;
/// it is the caller's responsibility that re-subscription is still valid,
/// which is what lets a retry pick up at the current read position.
pub trait ChunkPublisher: Send + Sync {
    /// Opens a chunk stream for one session attempt.
    fn subscribe(&self) -> AudioStream;

    /// Takes the fatal source failure, if one ended the chunk stream.
    ///
    /// A stream that ends because its source failed looks identical to one
    /// that drained; the session driver checks here after each attempt so a
    /// broken source is not reported as a completed session.
    fn take_error(&self) -> Option<StreamscribeError> {
        None
    }
}

/// Bidirectional streaming transcription service.
#[async_trait]
pub trait TranscribeService: Send + Sync {
    /// Runs one session attempt to its single terminal outcome.
    ///
    /// Notifications (response metadata, transcript events) are delivered
    /// through `events` before the outcome resolves.
    async fn start_stream(
        &self,
        request: &SessionRequest,
        audio: AudioStream,
        events: &EventRelay<'_>,
    ) -> Result<(), TranscribeError>;
}

/// Replays a fixed set of chunks; for tests and demos.
#[derive(Debug, Clone)]
pub struct VecChunkPublisher {
    chunks: Vec<Vec<u8>>,
}

impl VecChunkPublisher {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self { chunks }
    }
}

impl ChunkPublisher for VecChunkPublisher {
    fn subscribe(&self) -> AudioStream {
        futures_util::stream::iter(self.chunks.clone()).boxed()
    }
}

/// Scripted service mock for exercising the retry client.
///
/// Consumes the audio stream, emits the configured events, then yields the
/// next scripted outcome. Records the request and the chunks of every
/// attempt.
pub struct MockTranscribeService {
    outcomes: std::sync::Mutex<std::collections::VecDeque<Result<(), TranscribeError>>>,
    events_per_attempt: Vec<TranscriptEvent>,
    requests_seen: std::sync::Mutex<Vec<SessionRequest>>,
    attempt_chunks: std::sync::Mutex<Vec<Vec<Vec<u8>>>>,
    chunk_limit: Option<usize>,
}

impl MockTranscribeService {
    /// Creates a mock yielding the given outcomes, one per attempt.
    pub fn scripted(outcomes: Vec<Result<(), TranscribeError>>) -> Self {
        Self {
            outcomes: std::sync::Mutex::new(outcomes.into()),
            events_per_attempt: Vec::new(),
            requests_seen: std::sync::Mutex::new(Vec::new()),
            attempt_chunks: std::sync::Mutex::new(Vec::new()),
            chunk_limit: None,
        }
    }

    /// Emits these events through the relay on every attempt.
    pub fn with_events(mut self, events: Vec<TranscriptEvent>) -> Self {
        self.events_per_attempt = events;
        self
    }

    /// Stops consuming audio after `limit` chunks per attempt, leaving the
    /// rest of the stream unread. Models a service that dies mid-call.
    pub fn with_chunk_limit(mut self, limit: usize) -> Self {
        self.chunk_limit = Some(limit);
        self
    }

    /// Requests observed so far, in attempt order.
    pub fn requests_seen(&self) -> Vec<SessionRequest> {
        self.requests_seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Chunk bytes drained from the audio stream, grouped per attempt.
    pub fn chunks_per_attempt(&self) -> Vec<Vec<Vec<u8>>> {
        self.attempt_chunks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Total chunks drained from audio streams across attempts.
    pub fn chunks_consumed(&self) -> usize {
        self.chunks_per_attempt().iter().map(Vec::len).sum()
    }
}

#[async_trait]
impl TranscribeService for MockTranscribeService {
    async fn start_stream(
        &self,
        request: &SessionRequest,
        mut audio: AudioStream,
        events: &EventRelay<'_>,
    ) -> Result<(), TranscribeError> {
        self.requests_seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request.clone());

        events.response(&SessionResponse {
            session_id: request.session_id.clone(),
            request_id: None,
        });

        let mut taken: Vec<Vec<u8>> = Vec::new();
        while self.chunk_limit.is_none_or(|limit| taken.len() < limit)
            && let Some(chunk) = audio.next().await
        {
            taken.push(chunk);
        }
        self.attempt_chunks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(taken);

        for event in &self.events_per_attempt {
            events.event(event);
        }

        self.outcomes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Ok(()))
    }
}
