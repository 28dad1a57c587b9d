//! Metadata-tracking visitor for fragment elements.
//!
//! Every element pulled from a source must pass through a visitor before its
//! payload type is tested. The tracker keeps the fragment-boundary
//! bookkeeping needed to resume the source read position after a reconnect.

use crate::error::Result;
use crate::fragment::element::{FragmentElement, Tag};

/// Visitor invoked for every element pulled from a fragment source.
pub trait ElementVisitor: Send {
    /// Visits one element. Returns an error for malformed element data.
    fn visit(&mut self, element: &FragmentElement) -> Result<()>;
}

/// Tracks fragment boundaries and tags across the element stream.
///
/// The last observed fragment number is the resume point handed to the
/// source store when the connection has to be rebuilt.
#[derive(Debug, Default)]
pub struct FragmentTracker {
    current_fragment: Option<String>,
    last_tag: Option<Tag>,
    elements_visited: u64,
    frames_seen: u64,
}

impl FragmentTracker {
    /// Creates a tracker with no fragments observed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment number of the most recently started fragment, if any.
    pub fn current_fragment(&self) -> Option<&str> {
        self.current_fragment.as_deref()
    }

    /// Most recent tag observed in fragment metadata, if any.
    pub fn last_tag(&self) -> Option<&Tag> {
        self.last_tag.as_ref()
    }

    /// Total elements visited, all types included.
    pub fn elements_visited(&self) -> u64 {
        self.elements_visited
    }

    /// Number of data (frame) elements seen.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl ElementVisitor for FragmentTracker {
    fn visit(&mut self, element: &FragmentElement) -> Result<()> {
        self.elements_visited += 1;
        match element {
            FragmentElement::Metadata(meta) => {
                self.current_fragment = Some(meta.fragment_number.clone());
            }
            FragmentElement::Tag(tag) => {
                self.last_tag = Some(tag.clone());
            }
            FragmentElement::Block(_) => {
                self.frames_seen += 1;
            }
        }
        Ok(())
    }
}
