use crate::image::{ConfidenceMap, DepthMap, ImageView};
use serde::Serialize;

/// Sentinel written to both depth and confidence of a hole pixel.
pub const HOLE: f32 = -1.0;

/// One fused (depth, confidence) estimate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FusedSample {
    pub depth: f32,
    pub confidence: f32,
}

/// Fused depth + confidence grids of one reference view.
///
/// Holes are stored as [`HOLE`] in both grids so the maps can be handed to
/// raster writers unchanged; use [`FusionResult::sample`] to read pixels as
/// an `Option` instead of comparing against the sentinel.
#[derive(Clone, Debug)]
pub struct FusionResult {
    pub reference: usize,
    pub depth: DepthMap,
    pub confidence: ConfidenceMap,
}

impl FusionResult {
    pub fn width(&self) -> usize {
        self.depth.width()
    }

    pub fn height(&self) -> usize {
        self.depth.height()
    }

    /// The fused estimate at (x, y), `None` for holes.
    pub fn sample(&self, x: usize, y: usize) -> Option<FusedSample> {
        let depth = self.depth.get(x, y);
        let confidence = self.confidence.get(x, y);
        (!is_hole(depth)).then_some(FusedSample { depth, confidence })
    }

    /// Number of pixels still marked as holes.
    pub fn hole_count(&self) -> usize {
        self.depth.data.iter().filter(|&&d| is_hole(d)).count()
    }
}

/// True for the hole sentinel (any negative depth).
#[inline]
pub fn is_hole(depth: f32) -> bool {
    depth < 0.0
}
