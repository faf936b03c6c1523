//! Per-reference fusion driver.
//!
//! [`DepthFuser`] owns the validated [`FusionParams`] and a dedicated rayon
//! pool. [`DepthFuser::fuse_view`] runs, for one reference view:
//!
//! - reprojection of every supporting view into the reference grid (the
//!   reference's own maps are borrowed as-is);
//! - the per-pixel consensus vote, writing fused values or holes;
//! - hole filling followed by inlier smoothing.
//!
//! Buffers are allocated per call and dropped afterwards; nothing is shared
//! between reference views.
use super::consensus::Consensus;
use super::inputs::FusionInputs;
use super::params::FusionParams;
use super::reproject::{reproject_view, ReprojectedBuffer};
use crate::diagnostics::{elapsed_ms, FusionReport, TimingBreakdown, ViewContribution};
use crate::error::FusionError;
use crate::filter::refine_fused;
use crate::image::{ConfidenceMap, DepthMap};
use crate::types::FusionResult;
use crate::views::ViewSet;
use log::{debug, info, warn};
use std::time::Instant;

/// Fused maps of one reference view plus the run's diagnostics.
#[derive(Clone, Debug)]
pub struct FusionOutput {
    pub result: FusionResult,
    pub report: FusionReport,
}

pub struct DepthFuser {
    params: FusionParams,
    pool: rayon::ThreadPool,
}

impl DepthFuser {
    /// Validate `params` and spin up the worker pool.
    pub fn new(params: FusionParams) -> Result<Self, FusionError> {
        params.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.num_threads.unwrap_or(0))
            .thread_name(|i| format!("fusion-{i}"))
            .build()?;
        Ok(Self { params, pool })
    }

    pub fn params(&self) -> &FusionParams {
        &self.params
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Fuse reference view `reference` against its supporting views.
    pub fn fuse_view(
        &self,
        inputs: &FusionInputs<'_>,
        views: &ViewSet,
        reference: usize,
    ) -> Result<FusionOutput, FusionError> {
        let supporting = views.validate_reference(reference, inputs.num_views())?;
        Ok(self
            .pool
            .install(|| self.run_reference(inputs, supporting, reference)))
    }

    /// Fuse every reference view described by `views`, in index order.
    pub fn fuse_all(
        &self,
        inputs: &FusionInputs<'_>,
        views: &ViewSet,
    ) -> Result<Vec<FusionOutput>, FusionError> {
        (0..views.len())
            .map(|reference| self.fuse_view(inputs, views, reference))
            .collect()
    }

    fn run_reference(
        &self,
        inputs: &FusionInputs<'_>,
        supporting: &[usize],
        reference: usize,
    ) -> FusionOutput {
        let total_start = Instant::now();
        let (w, h) = (inputs.width(), inputs.height());
        let mut timings = TimingBreakdown::default();
        info!(
            "fusing reference view {reference} ({w}x{h}) with {} supporting views",
            supporting.len()
        );

        let stage = Instant::now();
        let ref_cam = inputs.camera(reference);
        let buffers: Vec<ReprojectedBuffer<'_>> = supporting
            .iter()
            .map(|&view| {
                if view == reference {
                    ReprojectedBuffer::identity(
                        view,
                        inputs.depth(view),
                        inputs.confidence(view),
                    )
                } else {
                    reproject_view(
                        view,
                        inputs.depth(view),
                        inputs.confidence(view),
                        inputs.camera(view),
                        ref_cam,
                        self.params.conf_pre_filt,
                    )
                }
            })
            .collect();
        timings.push("reproject", elapsed_ms(stage));

        let contributions: Vec<ViewContribution> = buffers
            .iter()
            .map(|b| ViewContribution {
                view: b.view,
                samples: b.samples,
                identity: b.view == reference,
            })
            .collect();
        for c in &contributions {
            if c.samples == 0 {
                warn!(
                    "view {} contributes no samples to reference {reference}",
                    c.view
                );
            } else {
                debug!("view {} -> reference {reference}: {} samples", c.view, c.samples);
            }
        }

        let stage = Instant::now();
        let mut depth = DepthMap::new(w, h);
        let mut confidence = ConfidenceMap::new(w, h);
        let consensus = Consensus::new(&self.params, inputs, reference).fuse_grid(
            &buffers,
            &mut depth.data,
            &mut confidence.data,
        );
        drop(buffers);
        timings.push("consensus", elapsed_ms(stage));
        debug!(
            "consensus: fused={} rejected={} no_support={}",
            consensus.fused, consensus.rejected, consensus.no_support
        );

        let stage = Instant::now();
        let mut result = FusionResult {
            reference,
            depth,
            confidence,
        };
        let filter = refine_fused(&mut result, self.params.hole_fill, self.params.smoothing);
        timings.push("filter", elapsed_ms(stage));

        let holes_remaining = result.hole_count();
        timings.total_ms = elapsed_ms(total_start);
        info!(
            "reference view {reference}: {} holes after consensus, {} filled, {} remaining ({:.1} ms)",
            consensus.holes(),
            filter.holes_filled,
            holes_remaining,
            timings.total_ms
        );

        FusionOutput {
            result,
            report: FusionReport {
                reference,
                width: w,
                height: h,
                contributions,
                consensus,
                holes_after_consensus: consensus.holes(),
                holes_filled: filter.holes_filled,
                holes_remaining,
                timings,
            },
        }
    }
}
