//! Diagnostics emitted alongside fused maps.
//!
//! [`FusionReport`] describes one reference view: how many samples each
//! supporting view contributed, the consensus outcome counts, hole statistics
//! and a [`TimingBreakdown`] of the stages. Everything serializes to camelCase
//! JSON for the CLI's `report_json` output.

pub mod report;
pub mod timing;

pub use report::{FusionReport, RunSummary, ViewContribution};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
