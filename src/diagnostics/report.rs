use super::timing::TimingBreakdown;
use crate::fusion::ConsensusStats;
use serde::Serialize;

/// Samples one supporting view contributed to the reference grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewContribution {
    pub view: usize,
    /// Reference pixels that received an estimate from this view.
    pub samples: usize,
    /// True when the view is the reference itself (no reprojection).
    pub identity: bool,
}

/// Summary of fusing one reference view.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionReport {
    pub reference: usize,
    pub width: usize,
    pub height: usize,
    pub contributions: Vec<ViewContribution>,
    pub consensus: ConsensusStats,
    /// Holes left by consensus (rejected + unsupported pixels).
    pub holes_after_consensus: usize,
    pub holes_filled: usize,
    pub holes_remaining: usize,
    pub timings: TimingBreakdown,
}

impl FusionReport {
    /// Supporting views in vote order.
    pub fn supporting_views(&self) -> Vec<usize> {
        self.contributions.iter().map(|c| c.view).collect()
    }

    pub fn pixels(&self) -> usize {
        self.width * self.height
    }

    /// Share of pixels carrying an estimate after filtering, in `[0, 1]`.
    pub fn coverage(&self) -> f32 {
        let pixels = self.pixels();
        if pixels == 0 {
            return 0.0;
        }
        (pixels - self.holes_remaining) as f32 / pixels as f32
    }
}

/// Reports of a multi-view run, serialized next to the fused outputs.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub views: Vec<FusionReport>,
    pub points_written: usize,
    pub total_ms: f64,
}
