//! Element types for the fragmented media stream.
//!
//! Defines the typed elements a fragment source yields and the frame
//! payload carried by data elements.

/// One media frame extracted from a simple-block element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw frame payload bytes.
    pub data: Vec<u8>,
}

impl Frame {
    /// Creates a new frame.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Returns the payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Metadata announcing a new fragment boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentMetadata {
    /// Fragment number assigned by the source store; resuming a reconnect
    /// starts after the last number observed here.
    pub fragment_number: String,
    /// Producer-side timestamp in milliseconds.
    pub producer_timestamp_ms: u64,
}

/// A name/value tag embedded in fragment metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

/// A typed element pulled from the fragment source.
///
/// Exactly one variant — [`FragmentElement::Block`] — carries an extractable
/// byte payload. Every element must still be visited by the metadata tracker
/// before its type is tested, so fragment bookkeeping stays current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentElement {
    /// Start-of-fragment metadata.
    Metadata(FragmentMetadata),
    /// A business-level tag attached to the current fragment.
    Tag(Tag),
    /// A simple-block data element holding one frame.
    Block(Frame),
}

impl FragmentElement {
    /// Returns true if this element carries a frame payload.
    pub fn is_block(&self) -> bool {
        matches!(self, FragmentElement::Block(_))
    }

    /// Extracts the frame if this is a Block variant.
    pub fn into_frame(self) -> Option<Frame> {
        match self {
            FragmentElement::Block(frame) => Some(frame),
            _ => None,
        }
    }
}
