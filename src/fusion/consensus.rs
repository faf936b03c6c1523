//! Per-pixel consensus over the stack of reprojected estimates.
//!
//! For one reference pixel with samples `(depth_i, conf_i)`, one per
//! supporting view:
//!
//! 1. The most confident sample with a depth estimate seeds the fused value
//!    `(f, C)`. Ties keep the earlier view. No such sample → no support.
//! 2. Every other sample is classified against the seed depth `f0` with band
//!    `epsilon` from [`SupportRegion`](super::SupportRegion):
//!    - `|d - f0| < epsilon` agrees: `f` becomes the confidence-weighted mean
//!      and `C += conf`;
//!    - `d < f0` is an occlusion: `C -= conf`;
//!    - `d > f0` is a free-space violation: the seed point is projected into
//!      that view and the view's own confidence at that pixel is subtracted.
//! 3. `C` is normalized to `(C + N) / 2N` and clamped to `[0, 1]`.
//! 4. `C <= conf_post_filt` turns the pixel into a hole.
use super::inputs::FusionInputs;
use super::params::FusionParams;
use super::reproject::ReprojectedBuffer;
use crate::camera::CameraModel;
use crate::types::{FusedSample, HOLE};
use rayon::prelude::*;
use serde::Serialize;

/// Classification of one reference pixel after consensus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PixelOutcome {
    /// No sample carried a positive confidence and a depth estimate.
    NoSupport,
    /// Consensus ran but the normalized confidence failed the post-filter.
    Rejected { confidence: f32 },
    Fused(FusedSample),
}

impl PixelOutcome {
    pub fn sample(&self) -> Option<FusedSample> {
        match *self {
            PixelOutcome::Fused(s) => Some(s),
            _ => None,
        }
    }
}

/// Pixel counts per outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusStats {
    pub fused: usize,
    pub rejected: usize,
    pub no_support: usize,
}

impl ConsensusStats {
    fn record(&mut self, outcome: &PixelOutcome) {
        match outcome {
            PixelOutcome::Fused(_) => self.fused += 1,
            PixelOutcome::Rejected { .. } => self.rejected += 1,
            PixelOutcome::NoSupport => self.no_support += 1,
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.fused += other.fused;
        self.rejected += other.rejected;
        self.no_support += other.no_support;
        self
    }

    pub fn holes(&self) -> usize {
        self.rejected + self.no_support
    }
}

/// Everything the vote needs besides the samples of the current pixel.
pub struct Consensus<'a> {
    params: &'a FusionParams,
    inputs: &'a FusionInputs<'a>,
    reference: &'a CameraModel,
}

impl<'a> Consensus<'a> {
    pub fn new(
        params: &'a FusionParams,
        inputs: &'a FusionInputs<'a>,
        reference: usize,
    ) -> Self {
        Self {
            params,
            inputs,
            reference: inputs.camera(reference),
        }
    }

    /// Fuse the samples of reference pixel `(col, row)`.
    ///
    /// `samples[i]` is `(depth, confidence)` reprojected from `views[i]`; both
    /// slices have the same length.
    pub fn fuse_pixel(
        &self,
        col: usize,
        row: usize,
        samples: &[(f32, f32)],
        views: &[usize],
    ) -> PixelOutcome {
        let mut seed: Option<(usize, f32, f32)> = None;
        for (i, &(d, c)) in samples.iter().enumerate() {
            if d > 0.0 && c > seed.map_or(0.0, |s| s.2) {
                seed = Some((i, d, c));
            }
        }
        let Some((seed_idx, f0, c0)) = seed else {
            return PixelOutcome::NoSupport;
        };

        let epsilon = self.params.support.epsilon(f0);
        let mut f = f0;
        let mut conf = c0;
        for (i, &(d, c)) in samples.iter().enumerate() {
            if i == seed_idx || !(d > 0.0) {
                continue;
            }
            if self.params.min_support_conf.is_some_and(|min| c < min) {
                continue;
            }
            if (d - f0).abs() < epsilon {
                let total = conf + c;
                if total != 0.0 {
                    f = (f * conf + d * c) / total;
                }
                conf = total;
            } else if d < f0 {
                conf -= c;
            } else {
                conf -= self.free_space_penalty(col, row, f0, views[i]);
            }
        }

        let n = samples.len() as f32;
        let confidence = ((conf + n) / (2.0 * n)).clamp(0.0, 1.0);
        if confidence <= self.params.conf_post_filt {
            return PixelOutcome::Rejected { confidence };
        }
        PixelOutcome::Fused(FusedSample {
            depth: f,
            confidence,
        })
    }

    /// Confidence view `view` itself assigns to the pixel where it should have
    /// observed the seed surface; zero when the point leaves its frustum.
    fn free_space_penalty(&self, col: usize, row: usize, depth: f32, view: usize) -> f32 {
        let point = self
            .reference
            .back_project(col as f64, row as f64, depth as f64);
        let (w, h) = (self.inputs.width(), self.inputs.height());
        self.inputs
            .camera(view)
            .project_to_grid(&point, w, h)
            .filter(|hit| hit.depth > 0.0)
            .map_or(0.0, |hit| self.inputs.confidence(view).get(hit.col, hit.row))
    }

    /// Run the vote over every reference pixel, writing fused values (or
    /// [`HOLE`]) into `depth_out` / `conf_out`. Rows run in parallel on the
    /// current rayon pool.
    pub fn fuse_grid(
        &self,
        buffers: &[ReprojectedBuffer<'_>],
        depth_out: &mut [f32],
        conf_out: &mut [f32],
    ) -> ConsensusStats {
        let w = self.inputs.width();
        let views: Vec<usize> = buffers.iter().map(|b| b.view).collect();
        depth_out
            .par_chunks_mut(w)
            .zip(conf_out.par_chunks_mut(w))
            .enumerate()
            .map(|(row, (depth_row, conf_row))| {
                let mut stats = ConsensusStats::default();
                let mut samples = Vec::with_capacity(buffers.len());
                for col in 0..w {
                    let idx = row * w + col;
                    samples.clear();
                    samples.extend(buffers.iter().map(|b| b.at(idx)));
                    let outcome = self.fuse_pixel(col, row, &samples, &views);
                    stats.record(&outcome);
                    let (d, c) = outcome
                        .sample()
                        .map_or((HOLE, HOLE), |s| (s.depth, s.confidence));
                    depth_row[col] = d;
                    conf_row[col] = c;
                }
                stats
            })
            .reduce(ConsensusStats::default, ConsensusStats::merge)
    }
}
