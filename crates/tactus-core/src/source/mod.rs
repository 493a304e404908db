pub mod replay;

pub use replay::{RecordingHeader, RecordingWriter, ReplaySource};

use crate::error::Result;
use crate::frame::Frame;

/// Outcome of one acquisition attempt.
#[derive(Debug)]
pub enum Acquisition {
    /// A temporally aligned depth + infrared pair.
    Pair(Frame),
    /// Transient failure: the source produced nothing this attempt.
    /// Never fatal; callers skip and retry.
    Dropped,
    /// The source has no more frames (replay reached its end).
    Exhausted,
}

/// A supplier of aligned depth + infrared frame pairs.
///
/// Selected once at construction: live hardware capture and recorded
/// replay are different implementations of this trait, not a runtime
/// branch inside one.
pub trait FrameSource {
    fn acquire(&mut self) -> Result<Acquisition>;

    /// Pixel grid dimensions as (height, width).
    fn dimensions(&self) -> (usize, usize);
}
