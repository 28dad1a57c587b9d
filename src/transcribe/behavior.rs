//! Caller behavior contract and the event relay that shields the stream
//! from misbehaving consumers.

use crate::error::Result;
use crate::transcribe::classify::TranscribeError;
use crate::transcribe::service::{SessionResponse, TranscriptEvent};

/// Hooks the caller supplies for one top-level streaming call.
///
/// `on_error` and `on_complete` are terminal: the retry client invokes
/// exactly one of them, at most once, after the whole retry chain resolves.
/// `on_event` may fail; failures are confined to the relay boundary and
/// never affect retry state or the terminal outcome.
pub trait TranscriptionBehavior: Send + Sync {
    /// Stream metadata arrived for the current attempt.
    fn on_response(&self, response: &SessionResponse);

    /// An incremental transcription result arrived.
    fn on_event(&self, event: &TranscriptEvent) -> Result<()>;

    /// The chain failed terminally.
    fn on_error(&self, error: &TranscribeError);

    /// The chain completed.
    fn on_complete(&self);
}

/// Forwards sink notifications to the caller's hooks.
///
/// A failing event hook is logged and discarded so one bad downstream
/// consumer cannot abort an otherwise healthy stream. Transport-level
/// terminal signals are not routed through here; the retry client's own
/// outcome is the single source of truth for terminal state.
pub struct EventRelay<'a> {
    behavior: &'a dyn TranscriptionBehavior,
}

impl<'a> EventRelay<'a> {
    /// Wraps the caller's behavior for one or more attempts.
    pub fn new(behavior: &'a dyn TranscriptionBehavior) -> Self {
        Self { behavior }
    }

    /// Forwards stream metadata synchronously.
    pub fn response(&self, response: &SessionResponse) {
        self.behavior.on_response(response);
    }

    /// Forwards a transcript event, confining hook failures.
    pub fn event(&self, event: &TranscriptEvent) {
        if let Err(e) = self.behavior.on_event(event) {
            log::warn!("transcript event hook failed, continuing stream: {}", e);
        }
    }
}
