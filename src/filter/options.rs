use serde::{Deserialize, Serialize};

/// Square median window with a minimum number of valid samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedianWindow {
    /// Side length in pixels (odd).
    pub size: usize,
    /// Minimum count of valid (`>= 0`) samples required to replace the centre.
    pub min_inliers: usize,
}

impl MedianWindow {
    pub const fn new(size: usize, min_inliers: usize) -> Self {
        Self { size, min_inliers }
    }

    /// Hole-filling default: 5×5 window, at least ⌊25/3⌋ inliers.
    pub const fn hole_fill() -> Self {
        Self::new(5, 25 / 3)
    }

    /// Smoothing default: 3×3 window, at least ⌊9/4⌋ inliers.
    pub const fn smoothing() -> Self {
        Self::new(3, 9 / 4)
    }

    #[inline]
    pub fn half(&self) -> usize {
        self.size / 2
    }

    pub fn is_valid(&self) -> bool {
        self.size % 2 == 1
    }
}
