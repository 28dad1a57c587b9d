//! Transport error kinds and retry classification.
//!
//! The transport layer labels each failure with an explicit kind, so the
//! retry decision is a set-membership test rather than an inspection of an
//! opaque cause chain.

use thiserror::Error;

/// Failure category reported by the streaming transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Malformed or unsendable request; replaying it cannot succeed.
    BadRequest,
    /// Service asked us to slow down.
    Throttled,
    /// Connection reset or dropped mid-stream.
    ConnectionReset,
    /// Service-side transient unavailability.
    ServiceUnavailable,
    /// Service-side internal error.
    Internal,
    /// Transport-level timeout.
    Timeout,
}

/// Failure of one streaming session attempt.
///
/// `kind` is `None` when the transport could not classify the failure.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct TranscribeError {
    message: String,
    kind: Option<TransportErrorKind>,
}

impl TranscribeError {
    /// Creates a classified error.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: Some(kind),
        }
    }

    /// Creates an error the transport could not classify.
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
        }
    }

    /// The reported failure kind, if any.
    pub fn kind(&self) -> Option<TransportErrorKind> {
        self.kind
    }
}

/// Retry policy fixed at client construction.
///
/// A failure is retriable unless its kind is listed here. Unclassified
/// failures are retriable: failing open toward another attempt favors
/// availability over fast termination.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    non_retriable: Vec<TransportErrorKind>,
}

impl RetryPolicy {
    /// Creates a policy with the given non-retriable kinds.
    pub fn new(non_retriable: Vec<TransportErrorKind>) -> Self {
        Self { non_retriable }
    }

    /// Returns true if the failure is worth another session attempt.
    pub fn is_retriable(&self, error: &TranscribeError) -> bool {
        match error.kind() {
            Some(kind) => !self.non_retriable.contains(&kind),
            None => true,
        }
    }
}

impl Default for RetryPolicy {
    /// Only request-construction failures are terminal by default; resets,
    /// throttling and service-side errors all retry.
    fn default() -> Self {
        Self::new(vec![TransportErrorKind::BadRequest])
    }
}
