//! Pull/push impedance matcher.
//!
//! A [`FragmentRelay`] owns a fragment source and its metadata tracker and
//! exposes them as a [`ChunkPublisher`]: each subscription pulls chunks from
//! the current read position. Because the position lives here and not in the
//! subscription, a retried session attempt resumes exactly where the failed
//! one stopped.
//!
//! An extraction failure ends the outbound stream and is latched; the
//! session driver takes it via [`ChunkPublisher::take_error`] so a broken
//! source fails the session instead of passing for a drained one.

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;

use crate::defaults;
use crate::error::StreamscribeError;
use crate::extractor::{self, ChunkRead};
use crate::fragment::reader::FragmentSource;
use crate::fragment::stop::StopSignal;
use crate::fragment::visitor::FragmentTracker;
use crate::transcribe::service::{AudioStream, ChunkPublisher};

struct RelayState<S> {
    source: S,
    tracker: FragmentTracker,
    // Extraction failure that ended the stream, held until the session
    // driver takes it.
    error: Option<StreamscribeError>,
}

/// Chunk publisher over a fragment source.
///
/// The source/tracker pair carries positional state and is driven by a
/// single logical reader: the internal lock serializes pulls, and attempts
/// are sequential by construction in the retry client.
pub struct FragmentRelay<S> {
    state: Arc<Mutex<RelayState<S>>>,
    stop: StopSignal,
    frames_per_chunk: usize,
}

impl<S> Clone for FragmentRelay<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            stop: self.stop.clone(),
            frames_per_chunk: self.frames_per_chunk,
        }
    }
}

impl<S: FragmentSource> FragmentRelay<S> {
    /// Creates a relay with the default frames-per-chunk.
    pub fn new(source: S, stop: StopSignal) -> Self {
        Self::with_frames_per_chunk(source, stop, defaults::FRAMES_PER_CHUNK)
    }

    /// Creates a relay concatenating up to `frames_per_chunk` frames per
    /// outbound chunk.
    pub fn with_frames_per_chunk(source: S, stop: StopSignal, frames_per_chunk: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(RelayState {
                source,
                tracker: FragmentTracker::new(),
                error: None,
            })),
            stop,
            frames_per_chunk,
        }
    }

    /// Fragment number of the most recently started fragment.
    ///
    /// This is the resume point for reconnecting the source store after the
    /// media connection itself has to be rebuilt.
    pub fn current_fragment(&self) -> Option<String> {
        let guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.tracker.current_fragment().map(str::to_string)
    }

    /// Total frames pulled through this relay so far.
    pub fn frames_seen(&self) -> u64 {
        let guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.tracker.frames_seen()
    }

    fn pull_chunk(&self) -> Option<Vec<u8>> {
        let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let RelayState { source, tracker, error } = &mut *guard;
        match extractor::next_chunk(source, tracker, &self.stop, self.frames_per_chunk) {
            Ok(ChunkRead::Data(bytes)) => Some(bytes),
            Ok(ChunkRead::Stopped) | Ok(ChunkRead::Drained) => None,
            Err(e) => {
                log::error!("chunk extraction failed, ending audio stream: {}", e);
                *error = Some(e);
                None
            }
        }
    }
}

impl<S: FragmentSource + 'static> ChunkPublisher for FragmentRelay<S> {
    fn subscribe(&self) -> AudioStream {
        let relay = self.clone();
        futures_util::stream::unfold(relay, |relay| async move {
            relay.pull_chunk().map(|bytes| (bytes, relay))
        })
        .boxed()
    }

    fn take_error(&self) -> Option<StreamscribeError> {
        let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.error.take()
    }
}
