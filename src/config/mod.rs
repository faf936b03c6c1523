//! JSON runtime configuration of the `depth_fusion` binary.

pub mod fusion;

pub use fusion::{load_config, FusionRunConfig, OutputConfig, ViewRange};
