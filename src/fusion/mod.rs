//! Confidence-based fusion of per-view depth maps.
//!
//! The entry point is [`DepthFuser`]; the stages it chains are public so they
//! can be driven individually.

pub mod consensus;
pub mod inputs;
pub mod params;
pub mod pipeline;
pub mod reproject;

pub use consensus::{Consensus, ConsensusStats, PixelOutcome};
pub use inputs::FusionInputs;
pub use params::{FusionParams, SupportRegion};
pub use pipeline::{DepthFuser, FusionOutput};
pub use reproject::{reproject_view, ReprojectedBuffer};
