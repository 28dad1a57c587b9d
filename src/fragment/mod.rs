//! Fragmented media source model.
//!
//! Elements, the source trait, the metadata-tracking visitor, and the stop
//! signal the extractor consults.

pub mod element;
pub mod reader;
pub mod stop;
pub mod visitor;

pub use element::{Frame, FragmentElement, FragmentMetadata, Tag};
pub use reader::{FragmentSource, VecFragmentSource};
pub use stop::StopSignal;
pub use visitor::{ElementVisitor, FragmentTracker};
