//! Render a supporting view's depth + confidence into the reference grid.
//!
//! Every valid source pixel is lifted to a world point with the source camera,
//! projected into the reference camera and floored to a destination pixel.
//! When several source pixels land on the same destination the nearest one
//! (smallest reference z-depth) is kept together with its confidence.
//!
//! Scatter
//! - Source rows are processed in parallel. Each destination cell is an
//!   `AtomicU64` holding `(depth_bits << 32) | source_index`; writers
//!   `fetch_min` their key into it.
//! - Positive finite `f32` values order like their bit patterns, so the minimum
//!   key is the nearest sample. Equal depths fall back to the smaller source
//!   index, which is the sample a row-major serial scan with "overwrite only
//!   if strictly closer" keeps. The result does not depend on scheduling.
//! - A resolve pass decodes the keys and looks the confidence up in the source
//!   map by index.
use crate::camera::CameraModel;
use crate::image::{ConfidenceMap, DepthMap};
use rayon::prelude::*;
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

const EMPTY: u64 = u64::MAX;
const INDEX_MASK: u64 = 0xffff_ffff;

/// Depth + confidence of one supporting view aligned to the reference grid.
#[derive(Clone, Debug)]
pub struct ReprojectedBuffer<'a> {
    /// Supporting view index the buffer was rendered from.
    pub view: usize,
    pub depth: Cow<'a, DepthMap>,
    pub confidence: Cow<'a, ConfidenceMap>,
    /// Destination pixels holding an estimate.
    pub samples: usize,
}

impl<'a> ReprojectedBuffer<'a> {
    /// The reference view's own maps, borrowed without any geometric work.
    pub fn identity(view: usize, depth: &'a DepthMap, confidence: &'a ConfidenceMap) -> Self {
        let samples = depth.data.iter().filter(|&&d| d > 0.0).count();
        Self {
            view,
            depth: Cow::Borrowed(depth),
            confidence: Cow::Borrowed(confidence),
            samples,
        }
    }

    /// `(depth, confidence)` at linear pixel index `idx`.
    #[inline]
    pub fn at(&self, idx: usize) -> (f32, f32) {
        (self.depth.data[idx], self.confidence.data[idx])
    }
}

#[inline]
fn pack(depth: f32, source_index: usize) -> u64 {
    ((depth.to_bits() as u64) << 32) | source_index as u64
}

#[inline]
fn unpack(key: u64) -> (f32, usize) {
    (f32::from_bits((key >> 32) as u32), (key & INDEX_MASK) as usize)
}

/// Reproject view `view` (maps + camera) into the grid of `reference`.
///
/// Source pixels without an estimate (`depth <= 0`) or with confidence below
/// `conf_pre_filt` are skipped, as are points falling outside the reference
/// grid or behind the reference camera. Runs on the current rayon pool.
pub fn reproject_view<'a>(
    view: usize,
    depth: &DepthMap,
    confidence: &ConfidenceMap,
    camera: &CameraModel,
    reference: &CameraModel,
    conf_pre_filt: Option<f32>,
) -> ReprojectedBuffer<'a> {
    let (w, h) = depth.dims();
    let cells: Vec<AtomicU64> = (0..w * h).map(|_| AtomicU64::new(EMPTY)).collect();

    depth
        .data
        .par_chunks(w)
        .zip(confidence.data.par_chunks(w))
        .enumerate()
        .for_each(|(r, (depth_row, conf_row))| {
            for (c, (&d, &conf)) in depth_row.iter().zip(conf_row).enumerate() {
                if !(d > 0.0) {
                    continue;
                }
                if conf_pre_filt.is_some_and(|min| conf < min) {
                    continue;
                }
                let world = camera.back_project(c as f64, r as f64, d as f64);
                let Some(hit) = reference.project_to_grid(&world, w, h) else {
                    continue;
                };
                let proj_depth = hit.depth as f32;
                if !(proj_depth.is_finite() && proj_depth > 0.0) {
                    continue;
                }
                let key = pack(proj_depth, r * w + c);
                cells[hit.row * w + hit.col].fetch_min(key, Ordering::Relaxed);
            }
        });

    let mut out_depth = DepthMap::new(w, h);
    let mut out_conf = ConfidenceMap::new(w, h);
    let samples = out_depth
        .data
        .par_iter_mut()
        .zip(out_conf.data.par_iter_mut())
        .zip(cells.into_par_iter())
        .map(|((d, c), cell)| {
            let key = cell.into_inner();
            if key == EMPTY {
                return 0usize;
            }
            let (proj_depth, source) = unpack(key);
            *d = proj_depth;
            *c = confidence.data[source];
            1
        })
        .sum();

    ReprojectedBuffer {
        view,
        depth: Cow::Owned(out_depth),
        confidence: Cow::Owned(out_conf),
        samples,
    }
}
