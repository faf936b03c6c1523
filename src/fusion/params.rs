//! Parameters for one fusion run.
//!
//! Defaults follow the DTU setup: depths roughly 450–950 mm, a 1% support
//! ratio and a 0.5 post-filter on the normalized confidence.

use crate::error::FusionError;
use crate::filter::MedianWindow;
use serde::{Deserialize, Serialize};

/// How wide the agreement band around the initial depth estimate is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportRegion {
    /// `epsilon = ratio × depth`; scales with the scene's depth range.
    Ratio(f32),
    /// Fixed `epsilon` in depth units.
    Absolute(f32),
}

impl SupportRegion {
    #[inline]
    pub fn epsilon(&self, depth: f32) -> f32 {
        match *self {
            SupportRegion::Ratio(r) => r * depth,
            SupportRegion::Absolute(eps) => eps,
        }
    }
}

impl Default for SupportRegion {
    fn default() -> Self {
        SupportRegion::Ratio(0.01)
    }
}

/// Thresholds and filter windows shared by all fusion stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionParams {
    /// Source pixels with confidence below this are not reprojected.
    /// `None` disables the pre-filter.
    pub conf_pre_filt: Option<f32>,
    /// Fused pixels with normalized confidence `<=` this become holes.
    pub conf_post_filt: f32,
    /// Agreement band around the initial estimate.
    pub support: SupportRegion,
    /// Samples below this confidence are ignored by the consensus vote.
    pub min_support_conf: Option<f32>,
    /// Window used to fill holes after consensus.
    pub hole_fill: MedianWindow,
    /// Window used to smooth inliers after hole filling.
    pub smoothing: MedianWindow,
    /// Worker threads; `None` lets rayon pick.
    pub num_threads: Option<usize>,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            conf_pre_filt: Some(0.1),
            conf_post_filt: 0.5,
            support: SupportRegion::default(),
            min_support_conf: None,
            hole_fill: MedianWindow::hole_fill(),
            smoothing: MedianWindow::smoothing(),
            num_threads: None,
        }
    }
}

impl FusionParams {
    pub fn with_support(mut self, support: SupportRegion) -> Self {
        self.support = support;
        self
    }

    pub fn with_pre_filter(mut self, conf_pre_filt: Option<f32>) -> Self {
        self.conf_pre_filt = conf_pre_filt;
        self
    }

    pub fn with_post_filter(mut self, conf_post_filt: f32) -> Self {
        self.conf_post_filt = conf_post_filt;
        self
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    pub fn validate(&self) -> Result<(), FusionError> {
        if !self.hole_fill.is_valid() {
            return Err(FusionError::InvalidWindow {
                name: "hole_fill",
                size: self.hole_fill.size,
            });
        }
        if !self.smoothing.is_valid() {
            return Err(FusionError::InvalidWindow {
                name: "smoothing",
                size: self.smoothing.size,
            });
        }
        let (name, value) = match self.support {
            SupportRegion::Ratio(r) => ("support.ratio", r),
            SupportRegion::Absolute(eps) => ("support.absolute", eps),
        };
        if !(value.is_finite() && value >= 0.0) {
            return Err(FusionError::InvalidParameter {
                name,
                reason: format!("must be finite and non-negative, got {value}"),
            });
        }
        if !self.conf_post_filt.is_finite() {
            return Err(FusionError::InvalidParameter {
                name: "conf_post_filt",
                reason: "must be finite".into(),
            });
        }
        if self.num_threads == Some(0) {
            return Err(FusionError::InvalidParameter {
                name: "num_threads",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
