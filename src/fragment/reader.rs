//! Fragment source abstraction.
//!
//! A fragment source is the lazy element sequence produced by the remote
//! media store. It is restartable only by reconnecting, so positional state
//! lives in the source and its paired tracker.

use crate::error::Result;
use crate::fragment::element::FragmentElement;

/// Lazy sequence of fragment elements.
///
/// `might_have_next` is a non-blocking readiness probe, not a guarantee that
/// a pull will yield an element. Implementations over live connections may
/// block inside `next_if_available` only as far as the underlying transport
/// read does.
pub trait FragmentSource: Send {
    /// Returns true if more elements might still arrive.
    fn might_have_next(&self) -> bool;

    /// Pulls the next element if one is available right now.
    fn next_if_available(&mut self) -> Result<Option<FragmentElement>>;
}

/// In-memory fragment source for tests and demos.
///
/// Yields a fixed list of elements in order, then reports exhaustion.
#[derive(Debug, Default)]
pub struct VecFragmentSource {
    elements: std::collections::VecDeque<FragmentElement>,
}

impl VecFragmentSource {
    /// Creates a source over the given elements.
    pub fn new(elements: Vec<FragmentElement>) -> Self {
        Self {
            elements: elements.into(),
        }
    }

    /// Appends an element to the tail of the sequence.
    pub fn push(&mut self, element: FragmentElement) {
        self.elements.push_back(element);
    }

    /// Remaining element count.
    pub fn remaining(&self) -> usize {
        self.elements.len()
    }
}

impl FragmentSource for VecFragmentSource {
    fn might_have_next(&self) -> bool {
        !self.elements.is_empty()
    }

    fn next_if_available(&mut self) -> Result<Option<FragmentElement>> {
        Ok(self.elements.pop_front())
    }
}
