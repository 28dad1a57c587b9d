//! Stop signal latch.
//!
//! Set by business logic outside the extraction core (for example when a
//! correlation tag observed in fragment metadata no longer matches the
//! session). Consulted before every extraction attempt; once set it stays
//! set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Clonable boolean latch shared between the stop-condition owner and the
/// extractor.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    /// Creates an unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches the signal. Idempotent.
    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true once the signal has been set.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_signal_starts_unset() {
        let signal = StopSignal::new();
        assert!(!signal.is_set());
    }

    #[test]
    fn test_stop_signal_latches() {
        let signal = StopSignal::new();
        signal.set();
        assert!(signal.is_set());

        // Setting again keeps it set
        signal.set();
        assert!(signal.is_set());
    }

    #[test]
    fn test_stop_signal_shared_across_clones() {
        let signal = StopSignal::new();
        let observer = signal.clone();

        signal.set();
        assert!(observer.is_set());
    }
}
