//! Thresholded median over square windows.
//!
//! Negative values count as missing. A window with fewer valid samples than
//! the threshold leaves its centre unchanged; otherwise the centre becomes the
//! lower median of the valid samples.
use super::options::MedianWindow;
use crate::image::{ConfidenceMap, DepthMap};
use crate::types::{is_hole, HOLE};
use rayon::prelude::*;

/// Median of the valid (`>= 0`) values of a row-major odd square window.
///
/// Returns the window centre when fewer than `min_inliers` values are valid,
/// and [`HOLE`] for an empty window.
pub fn median_filter(window: &[f32], min_inliers: usize) -> f32 {
    let Some(&center) = window.get(window.len() / 2) else {
        return HOLE;
    };
    let mut inliers: Vec<f32> = window.iter().copied().filter(|v| *v >= 0.0).collect();
    if inliers.is_empty() || inliers.len() < min_inliers {
        return center;
    }
    inliers.sort_unstable_by(f32::total_cmp);
    inliers[(inliers.len() - 1) / 2]
}

/// Median inlier of a depth window together with its confidence.
fn median_pair(
    depth: &[f32],
    confidence: &[f32],
    min_inliers: usize,
    scratch: &mut Vec<(f32, f32)>,
) -> Option<(f32, f32)> {
    scratch.clear();
    scratch.extend(
        depth
            .iter()
            .copied()
            .zip(confidence.iter().copied())
            .filter(|(d, _)| *d >= 0.0),
    );
    if scratch.is_empty() || scratch.len() < min_inliers {
        return None;
    }
    scratch.sort_by(|a, b| a.0.total_cmp(&b.0));
    Some(scratch[(scratch.len() - 1) / 2])
}

/// Indices whose full window fits inside `0..len`.
#[inline]
fn interior(len: usize, half: usize) -> std::ops::Range<usize> {
    half..len.saturating_sub(half)
}

/// Replace holes with the median of their valid neighbours.
///
/// Only interior pixels (at least `window.half()` from every border) are
/// visited; margins keep their input values. A filled pixel takes both depth
/// and confidence of the median neighbour. Returns the new grids and the
/// number of holes filled.
pub fn fill_holes(
    depth: &DepthMap,
    confidence: &ConfidenceMap,
    window: MedianWindow,
) -> (DepthMap, ConfidenceMap, usize) {
    let mut out_depth = depth.clone();
    let mut out_conf = confidence.clone();
    let (w, h) = depth.dims();
    let half = window.half();
    let cols = interior(w, half);
    let rows = interior(h, half);

    let filled = out_depth
        .data
        .par_chunks_mut(w)
        .zip(out_conf.data.par_chunks_mut(w))
        .enumerate()
        .filter(|(y, _)| rows.contains(y))
        .map(|(y, (depth_row, conf_row))| {
            let mut win_depth = Vec::with_capacity(window.size * window.size);
            let mut win_conf = Vec::with_capacity(window.size * window.size);
            let mut scratch = Vec::with_capacity(window.size * window.size);
            let mut count = 0usize;
            for x in cols.clone() {
                if !is_hole(depth.get(x, y)) {
                    continue;
                }
                depth.window_into(x, y, window.size, &mut win_depth);
                confidence.window_into(x, y, window.size, &mut win_conf);
                if let Some((d, c)) =
                    median_pair(&win_depth, &win_conf, window.min_inliers, &mut scratch)
                {
                    depth_row[x] = d;
                    conf_row[x] = c;
                    count += 1;
                }
            }
            count
        })
        .sum();

    (out_depth, out_conf, filled)
}

/// Median-smooth the depth of every non-hole interior pixel.
///
/// Holes stay holes and margins keep their input values; confidence is not
/// touched.
pub fn smooth_inliers(depth: &DepthMap, window: MedianWindow) -> DepthMap {
    let mut out = depth.clone();
    let (w, h) = depth.dims();
    let half = window.half();
    let cols = interior(w, half);
    let rows = interior(h, half);

    out.data
        .par_chunks_mut(w)
        .enumerate()
        .filter(|(y, _)| rows.contains(y))
        .for_each(|(y, row)| {
            let mut win = Vec::with_capacity(window.size * window.size);
            for x in cols.clone() {
                if is_hole(depth.get(x, y)) {
                    continue;
                }
                depth.window_into(x, y, window.size, &mut win);
                row[x] = median_filter(&win, window.min_inliers);
            }
        });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageF32;

    #[test]
    fn median_of_three_by_three_window() {
        let win = [-1.0, 2.0, 3.0, 4.0, -1.0, 6.0, 7.0, 8.0, 9.0];
        assert_eq!(median_filter(&win, 2), 6.0);
    }

    #[test]
    fn too_few_inliers_keep_centre() {
        let win = [-1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 8.0, 9.0];
        assert_eq!(median_filter(&win, 3), -1.0);
        assert_eq!(median_filter(&[-1.0; 9], 0), -1.0);
    }

    #[test]
    fn empty_window_is_missing() {
        assert_eq!(median_filter(&[], 0), HOLE);
        assert_eq!(median_filter(&[], 3), HOLE);
    }

    #[test]
    fn even_inlier_count_takes_lower_median() {
        let win = [1.0, 4.0, -1.0, 3.0, 5.0, -1.0, 2.0, -1.0, -1.0];
        // {1, 3, 4, 5} → 3, not 4
        let win_even = [1.0, 4.0, -1.0, 3.0, 5.0, -1.0, -1.0, -1.0, -1.0];
        assert_eq!(median_filter(&win, 1), 3.0);
        assert_eq!(median_filter(&win_even, 1), 3.0);
    }

    #[test]
    fn fill_replaces_isolated_hole_and_keeps_margins() {
        let mut depth = ImageF32::filled(7, 7, 10.0);
        let mut conf = ImageF32::filled(7, 7, 0.8);
        depth.set(3, 3, HOLE);
        conf.set(3, 3, HOLE);
        depth.set(0, 0, HOLE);
        conf.set(0, 0, HOLE);
        let (d, c, filled) = fill_holes(&depth, &conf, MedianWindow::hole_fill());
        assert_eq!(filled, 1);
        assert_eq!(d.get(3, 3), 10.0);
        assert_eq!(c.get(3, 3), 0.8);
        assert_eq!(d.get(0, 0), HOLE);
        assert_eq!(c.get(0, 0), HOLE);
    }

    #[test]
    fn sparse_neighbourhood_stays_a_hole() {
        let mut depth = ImageF32::filled(5, 5, HOLE);
        let conf = ImageF32::filled(5, 5, HOLE);
        for x in 0..5 {
            depth.set(x, 0, 3.0);
        }
        let (d, _, filled) = fill_holes(&depth, &conf, MedianWindow::hole_fill());
        assert_eq!(filled, 0);
        assert_eq!(d.get(2, 2), HOLE);
    }

    #[test]
    fn smoothing_removes_spike_but_not_holes() {
        let mut depth = ImageF32::filled(5, 5, 4.0);
        depth.set(2, 2, 40.0);
        depth.set(1, 2, HOLE);
        let out = smooth_inliers(&depth, MedianWindow::smoothing());
        assert_eq!(out.get(2, 2), 4.0);
        assert_eq!(out.get(1, 2), HOLE);
        assert_eq!(out.get(0, 0), 4.0);
    }
}
