//! Frame-to-chunk extraction.
//!
//! Pulls individual frames from a lazy fragment-element sequence and
//! assembles them into contiguous byte chunks sized for a streaming API.
//! Extraction never blocks beyond what the underlying source already
//! offers: `might_have_next` is a readiness probe, not a promise.

use crate::error::Result;
use crate::fragment::reader::FragmentSource;
use crate::fragment::stop::StopSignal;
use crate::fragment::visitor::ElementVisitor;

/// Outcome of a single-frame extraction attempt.
///
/// Callers can tell "try again later" (`Drained` on a still-live source)
/// apart from a stop-condition latch (`Stopped`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameRead {
    /// One frame payload was extracted.
    Data(Vec<u8>),
    /// The stop signal was set; nothing was consumed after the latch.
    Stopped,
    /// The source offered no further elements right now.
    Drained,
}

/// Outcome of a chunk extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkRead {
    /// Concatenation of one or more frame payloads, in pull order.
    Data(Vec<u8>),
    /// The stop signal was set before any frame was collected.
    Stopped,
    /// The source offered no frames at all.
    Drained,
}

impl ChunkRead {
    /// Returns the chunk bytes if data was collected.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            ChunkRead::Data(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Extracts the next frame payload from the source.
///
/// Every element pulled is visited with the tracker first, whatever its
/// type, so fragment bookkeeping stays current. The first data element
/// short-circuits the loop and its payload is returned without draining
/// further elements.
pub fn next_frame<S: FragmentSource>(
    source: &mut S,
    visitor: &mut dyn ElementVisitor,
    stop: &StopSignal,
) -> Result<FrameRead> {
    if stop.is_set() {
        return Ok(FrameRead::Stopped);
    }

    while source.might_have_next() {
        let Some(element) = source.next_if_available()? else {
            continue;
        };

        visitor.visit(&element)?;

        if let Some(frame) = element.into_frame() {
            return Ok(FrameRead::Data(frame.data));
        }
    }

    Ok(FrameRead::Drained)
}

/// Extracts up to `frame_count` frames and concatenates their payloads.
///
/// Stops early on the first non-data read and flushes whatever was
/// collected. Chunk size is best-effort up to `frame_count` frames, never
/// padded or truncated.
pub fn next_chunk<S: FragmentSource>(
    source: &mut S,
    visitor: &mut dyn ElementVisitor,
    stop: &StopSignal,
    frame_count: usize,
) -> Result<ChunkRead> {
    let mut frames: Vec<Vec<u8>> = Vec::new();
    let mut ended = FrameRead::Drained;

    for _ in 0..frame_count {
        match next_frame(source, visitor, stop)? {
            FrameRead::Data(bytes) => frames.push(bytes),
            other => {
                ended = other;
                break;
            }
        }
    }

    if frames.is_empty() {
        return Ok(match ended {
            FrameRead::Stopped => ChunkRead::Stopped,
            _ => ChunkRead::Drained,
        });
    }

    let total: usize = frames.iter().map(Vec::len).sum();
    let mut combined = Vec::with_capacity(total);
    for frame in frames {
        combined.extend_from_slice(&frame);
    }

    Ok(ChunkRead::Data(combined))
}
