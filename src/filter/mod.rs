//! Post-consensus hole filling and smoothing.
//!
//! Two sequential thresholded-median passes over the fused grid:
//!
//! - fill: 5×5 window, holes take the median valid neighbour when at least
//!   ⌊25/3⌋ neighbours are valid;
//! - smooth: 3×3 window over the filled grid, non-hole pixels take the median
//!   of their valid neighbourhood when at least ⌊9/4⌋ are valid.
//!
//! Only interior pixels are visited; a margin of half a window keeps its
//! fused values.

pub mod median;
pub mod options;

pub use median::{fill_holes, median_filter, smooth_inliers};
pub use options::MedianWindow;

use crate::types::FusionResult;
use serde::Serialize;

/// Counts reported by [`refine_fused`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    pub holes_filled: usize,
}

/// Run the fill pass and then the smoothing pass on `result` in place.
pub fn refine_fused(
    result: &mut FusionResult,
    hole_fill: MedianWindow,
    smoothing: MedianWindow,
) -> FilterStats {
    let (filled_depth, filled_conf, holes_filled) =
        fill_holes(&result.depth, &result.confidence, hole_fill);
    result.depth = smooth_inliers(&filled_depth, smoothing);
    result.confidence = filled_conf;
    FilterStats { holes_filled }
}
