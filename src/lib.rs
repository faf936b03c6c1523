#![doc = include_str!("../README.md")]

// Core fusion
pub mod camera;
pub mod error;
pub mod filter;
pub mod fusion;
pub mod image;
pub mod types;
pub mod views;

// File adapters and reporting used by the binary.
pub mod config;
pub mod dataset;
pub mod diagnostics;
pub mod pointcloud;

// --- High-level re-exports -------------------------------------------------

pub use crate::camera::{CameraError, CameraModel};
pub use crate::error::{DatasetError, FusionError};
pub use crate::fusion::{DepthFuser, FusionInputs, FusionOutput, FusionParams, SupportRegion};
pub use crate::types::{FusedSample, FusionResult, HOLE};
pub use crate::views::ViewSet;

pub use crate::diagnostics::{FusionReport, TimingBreakdown};

// --- Prelude ---------------------------------------------------------------

/// Everything needed to fuse a loaded dataset.
///
/// ```no_run
/// use depth_fusion::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dataset = Dataset::load(Path::new("scan9"), &DatasetLayout::default())?;
/// let fuser = DepthFuser::new(FusionParams::default())?;
/// for output in fuser.fuse_all(&dataset.inputs()?, &dataset.views)? {
///     println!("view {}: coverage {:.3}", output.result.reference, output.report.coverage());
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::dataset::{Dataset, DatasetLayout};
    pub use crate::image::{ConfidenceMap, DepthMap, ImageF32};
    pub use crate::{
        CameraModel, DatasetError, DepthFuser, FusionError, FusionInputs, FusionOutput,
        FusionParams, FusionResult, SupportRegion, ViewSet,
    };
}
