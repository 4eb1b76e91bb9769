//! Presentation sink trait.

use crate::types::{IndicatorFrame, Signal};

/// Read-only consumer of finished indicator frames (printing, charting).
///
/// Nothing a sink does feeds back into the computation.
pub trait FrameSink: Send + Sync {
    /// Present one symbol's frame and the signal derived from it.
    fn present(&self, frame: &IndicatorFrame, signal: Signal);
}
