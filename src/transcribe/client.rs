//! Resilient streaming client.
//!
//! Drives one transcription session to a single terminal outcome, retrying
//! transient failures with a fresh session id and a fixed delay between
//! attempts. The future returned by [`RetryClient::start_session`] is the
//! terminal outcome: it resolves exactly once for the whole retry chain.

use std::sync::Arc;
use std::time::Duration;

use crate::defaults;
use crate::metrics::MetricsSink;
use crate::transcribe::behavior::{EventRelay, TranscriptionBehavior};
use crate::transcribe::classify::{RetryPolicy, TranscribeError};
use crate::transcribe::request::SessionRequest;
use crate::transcribe::service::{ChunkPublisher, TranscribeService};

/// Retry client wrapping a streaming transcription service.
///
/// Attempts run strictly sequentially; the publisher is re-subscribed once
/// per attempt and the request is rebuilt with a new session id while all
/// other fields are preserved.
pub struct RetryClient<S> {
    service: S,
    policy: RetryPolicy,
    metrics: Arc<dyn MetricsSink>,
    retry_delay: Duration,
    max_attempts: Option<u32>,
}

impl<S: TranscribeService> RetryClient<S> {
    /// Creates a client with default retry policy, delay and attempt bound.
    pub fn new(service: S, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            service,
            policy: RetryPolicy::default(),
            metrics,
            retry_delay: Duration::from_millis(defaults::RETRY_DELAY_MS),
            max_attempts: Some(defaults::MAX_ATTEMPTS),
        }
    }

    /// Overrides the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Overrides the delay observed between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Overrides the attempt bound. `None` retries without bound.
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Borrows the wrapped service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Runs the session to its terminal outcome.
    ///
    /// On success the behavior's `on_complete` runs and a 0-valued outcome
    /// metric is recorded; on terminal failure `on_error` runs, a 1-valued
    /// outcome metric is recorded and the failure is returned. Each hook is
    /// invoked at most once per call regardless of how many attempts ran.
    ///
    /// A failure reported by the publisher's source is terminal even when
    /// the service resolved the attempt cleanly.
    pub async fn start_session(
        &self,
        request: SessionRequest,
        publisher: &dyn ChunkPublisher,
        behavior: &dyn TranscriptionBehavior,
    ) -> Result<(), TranscribeError> {
        let relay = EventRelay::new(behavior);
        let mut request = request.with_new_session_id();
        let mut attempt: u32 = 1;

        loop {
            log::debug!(
                "starting stream attempt {} (session {})",
                attempt,
                request.session_id
            );

            let audio = publisher.subscribe();
            let outcome = self.service.start_stream(&request, audio, &relay).await;

            // A source failure ends the outbound stream the same way a
            // drained source does, so the attempt outcome alone cannot tell
            // them apart. A failed source is terminal: retrying replays the
            // same broken read.
            if let Some(source_error) = publisher.take_error() {
                log::error!(
                    "audio source failed on attempt {}: {}",
                    attempt,
                    source_error
                );
                let error =
                    TranscribeError::unclassified(format!("audio source failed: {source_error}"));
                self.metrics.record(defaults::STREAM_OUTCOME_METRIC, 1.0);
                behavior.on_error(&error);
                return Err(error);
            }

            match outcome {
                Ok(()) => {
                    self.metrics.record(defaults::STREAM_OUTCOME_METRIC, 0.0);
                    behavior.on_complete();
                    return Ok(());
                }
                Err(error) => {
                    if self.policy.is_retriable(&error) && self.attempts_remain(attempt) {
                        log::debug!(
                            "retriable stream failure on attempt {}: {}",
                            attempt,
                            error
                        );
                        tokio::time::sleep(self.retry_delay).await;
                        request = request.with_new_session_id();
                        attempt += 1;
                    } else {
                        log::error!(
                            "stream failed terminally after {} attempt(s): {}",
                            attempt,
                            error
                        );
                        self.metrics.record(defaults::STREAM_OUTCOME_METRIC, 1.0);
                        behavior.on_error(&error);
                        return Err(error);
                    }
                }
            }
        }
    }

    fn attempts_remain(&self, attempt: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempt < max,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result as CrateResult;
    use crate::metrics::RecordingMetrics;
    use crate::transcribe::classify::TransportErrorKind;
    use crate::transcribe::service::{
        MockTranscribeService, SessionResponse, TranscriptEvent, VecChunkPublisher,
    };
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingBehavior {
        completes: AtomicUsize,
        errors: AtomicUsize,
        events: Mutex<Vec<TranscriptEvent>>,
        fail_event_hook: bool,
    }

    impl TranscriptionBehavior for CountingBehavior {
        fn on_response(&self, _response: &SessionResponse) {}

        fn on_event(&self, event: &TranscriptEvent) -> CrateResult<()> {
            self.events.lock().unwrap().push(event.clone());
            if self.fail_event_hook {
                Err(crate::error::StreamscribeError::Other(
                    "bad consumer".to_string(),
                ))
            } else {
                Ok(())
            }
        }

        fn on_error(&self, _error: &TranscribeError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_complete(&self) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn retriable(message: &str) -> TranscribeError {
        TranscribeError::new(TransportErrorKind::ConnectionReset, message)
    }

    fn fast_client(service: MockTranscribeService) -> RetryClient<MockTranscribeService> {
        RetryClient::new(service, Arc::new(RecordingMetrics::default()))
            .with_retry_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_success_after_two_retriable_failures() {
        let service = MockTranscribeService::scripted(vec![
            Err(retriable("first")),
            Err(retriable("second")),
            Ok(()),
        ]);
        let metrics = Arc::new(RecordingMetrics::default());
        let client = RetryClient::new(service, metrics.clone())
            .with_retry_delay(Duration::from_millis(1));
        let behavior = CountingBehavior::default();
        let publisher = VecChunkPublisher::new(vec![vec![0u8; 8]]);

        let outcome = client
            .start_session(SessionRequest::default(), &publisher, &behavior)
            .await;

        assert!(outcome.is_ok());
        assert_eq!(behavior.completes.load(Ordering::SeqCst), 1);
        assert_eq!(behavior.errors.load(Ordering::SeqCst), 0);

        // Exactly one metric record for the whole chain, value 0
        let records = metrics.records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            (defaults::STREAM_OUTCOME_METRIC.to_string(), 0.0)
        );
    }

    #[tokio::test]
    async fn test_session_id_differs_across_attempts() {
        let service = MockTranscribeService::scripted(vec![
            Err(retriable("first")),
            Err(retriable("second")),
            Ok(()),
        ]);
        let client = fast_client(service);
        let behavior = CountingBehavior::default();
        let publisher = VecChunkPublisher::new(vec![]);

        let request = SessionRequest::default();
        let language = request.language.clone();
        client
            .start_session(request, &publisher, &behavior)
            .await
            .unwrap();

        let requests = client.service.requests_seen();
        assert_eq!(requests.len(), 3);

        let ids: std::collections::HashSet<_> =
            requests.iter().map(|r| r.session_id.clone()).collect();
        assert_eq!(ids.len(), 3, "every attempt must carry a fresh session id");

        for request in &requests {
            assert_eq!(request.language, language);
            assert_eq!(request.sample_rate_hz, defaults::SAMPLE_RATE_HZ);
        }
    }

    #[tokio::test]
    async fn test_non_retriable_failure_stops_immediately() {
        let service = MockTranscribeService::scripted(vec![
            Err(TranscribeError::new(
                TransportErrorKind::BadRequest,
                "unsendable",
            )),
            Ok(()),
        ]);
        let metrics = Arc::new(RecordingMetrics::default());
        let client = RetryClient::new(service, metrics.clone())
            .with_retry_delay(Duration::from_millis(1));
        let behavior = CountingBehavior::default();
        let publisher = VecChunkPublisher::new(vec![]);

        let outcome = client
            .start_session(SessionRequest::default(), &publisher, &behavior)
            .await;

        let error = outcome.unwrap_err();
        assert_eq!(error.kind(), Some(TransportErrorKind::BadRequest));
        assert_eq!(behavior.errors.load(Ordering::SeqCst), 1);
        assert_eq!(behavior.completes.load(Ordering::SeqCst), 0);

        // No second attempt was made
        assert_eq!(client.service.requests_seen().len(), 1);

        let records = metrics.records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            (defaults::STREAM_OUTCOME_METRIC.to_string(), 1.0)
        );
    }

    #[tokio::test]
    async fn test_max_attempts_bounds_the_chain() {
        let service = MockTranscribeService::scripted(vec![
            Err(retriable("1")),
            Err(retriable("2")),
            Err(retriable("3")),
            Err(retriable("4")),
        ]);
        let client = fast_client(service).with_max_attempts(Some(3));
        let behavior = CountingBehavior::default();
        let publisher = VecChunkPublisher::new(vec![]);

        let outcome = client
            .start_session(SessionRequest::default(), &publisher, &behavior)
            .await;

        assert!(outcome.is_err());
        assert_eq!(client.service.requests_seen().len(), 3);
        assert_eq!(behavior.errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_source_failure_is_terminal_despite_clean_attempt() {
        use crate::error::StreamscribeError;
        use crate::transcribe::service::AudioStream;
        use futures_util::StreamExt;

        // Publisher whose source died: the stream ends cleanly but the
        // failure is waiting to be taken.
        struct FailingSourcePublisher {
            error: Mutex<Option<StreamscribeError>>,
        }

        impl ChunkPublisher for FailingSourcePublisher {
            fn subscribe(&self) -> AudioStream {
                futures_util::stream::iter(vec![vec![0u8; 4]]).boxed()
            }

            fn take_error(&self) -> Option<StreamscribeError> {
                self.error.lock().unwrap().take()
            }
        }

        let service = MockTranscribeService::scripted(vec![Ok(())]);
        let metrics = Arc::new(RecordingMetrics::default());
        let client = RetryClient::new(service, metrics.clone())
            .with_retry_delay(Duration::from_millis(1));
        let behavior = CountingBehavior::default();
        let publisher = FailingSourcePublisher {
            error: Mutex::new(Some(StreamscribeError::SourceRead {
                message: "connection dropped".to_string(),
            })),
        };

        let outcome = client
            .start_session(SessionRequest::default(), &publisher, &behavior)
            .await;

        let error = outcome.unwrap_err();
        assert!(error.to_string().contains("audio source failed"));
        assert_eq!(behavior.errors.load(Ordering::SeqCst), 1);
        assert_eq!(behavior.completes.load(Ordering::SeqCst), 0);

        // No retry: the attempt was not re-run against the dead source
        assert_eq!(client.service.requests_seen().len(), 1);
        assert_eq!(
            metrics.records(),
            vec![(defaults::STREAM_OUTCOME_METRIC.to_string(), 1.0)]
        );
    }

    #[tokio::test]
    async fn test_failing_event_hook_does_not_fail_the_chain() {
        let service = MockTranscribeService::scripted(vec![Ok(())]).with_events(vec![
            TranscriptEvent {
                transcript: "a".to_string(),
                is_partial: true,
            },
            TranscriptEvent {
                transcript: "ab".to_string(),
                is_partial: false,
            },
        ]);
        let client = fast_client(service);
        let behavior = CountingBehavior {
            fail_event_hook: true,
            ..Default::default()
        };
        let publisher = VecChunkPublisher::new(vec![]);

        let outcome = client
            .start_session(SessionRequest::default(), &publisher, &behavior)
            .await;

        assert!(outcome.is_ok());
        assert_eq!(behavior.events.lock().unwrap().len(), 2);
        assert_eq!(behavior.completes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unclassified_failure_retries() {
        let service = MockTranscribeService::scripted(vec![
            Err(TranscribeError::unclassified("socket vanished")),
            Ok(()),
        ]);
        let client = fast_client(service);
        let behavior = CountingBehavior::default();
        let publisher = VecChunkPublisher::new(vec![]);

        let outcome = client
            .start_session(SessionRequest::default(), &publisher, &behavior)
            .await;

        assert!(outcome.is_ok());
        assert_eq!(client.service.requests_seen().len(), 2);
    }

    #[tokio::test]
    async fn test_publisher_resubscribed_each_attempt() {
        let service =
            MockTranscribeService::scripted(vec![Err(retriable("first")), Ok(())]);
        let client = fast_client(service);
        let behavior = CountingBehavior::default();
        let publisher = VecChunkPublisher::new(vec![vec![1], vec![2]]);

        client
            .start_session(SessionRequest::default(), &publisher, &behavior)
            .await
            .unwrap();

        // Two attempts, two chunks replayed per subscription
        assert_eq!(client.service.chunks_consumed(), 4);
    }
}
