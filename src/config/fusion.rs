use crate::dataset::DatasetLayout;
use crate::fusion::FusionParams;
use serde::Deserialize;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct FusionRunConfig {
    pub data_root: PathBuf,
    /// Overrides `layout.max_supporting` when set.
    #[serde(default)]
    pub supporting_views: Option<usize>,
    #[serde(default)]
    pub layout: DatasetLayout,
    /// Reference views to fuse; all views when absent.
    #[serde(default)]
    pub views: Option<ViewRange>,
    pub output: OutputConfig,
    #[serde(default)]
    pub params: FusionParams,
}

impl FusionRunConfig {
    pub fn dataset_layout(&self) -> DatasetLayout {
        let mut layout = self.layout.clone();
        if let Some(n) = self.supporting_views {
            layout.max_supporting = n;
        }
        layout
    }

    /// Reference indices to fuse for a dataset of `num_views` views.
    pub fn references(&self, num_views: usize) -> Range<usize> {
        match &self.views {
            Some(range) => range.clamp(num_views),
            None => 0..num_views,
        }
    }
}

/// Half-open range of reference views, `end` defaulting to the view count.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct ViewRange {
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: Option<usize>,
}

impl ViewRange {
    pub fn clamp(&self, num_views: usize) -> Range<usize> {
        let end = self.end.unwrap_or(num_views).min(num_views);
        self.start.min(end)..end
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving per-view PLY files and exports.
    pub dir: PathBuf,
    #[serde(default)]
    pub merged_ply: Option<PathBuf>,
    #[serde(default)]
    pub export_csv: bool,
    #[serde(default)]
    pub export_png: bool,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<FusionRunConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: FusionRunConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    config
        .params
        .validate()
        .map_err(|e| format!("Invalid params in {}: {e}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::SupportRegion;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config: FusionRunConfig = serde_json::from_str(
            r#"{
                "data_root": "scan9/",
                "supporting_views": 2,
                "views": { "start": 3 },
                "output": { "dir": "out", "export_png": true },
                "params": { "support": { "ratio": 0.02 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.dataset_layout().max_supporting, 2);
        assert_eq!(config.dataset_layout().depth_dir, "depth_maps");
        assert_eq!(config.references(10), 3..10);
        assert_eq!(config.references(2), 2..2);
        assert!(config.output.export_png && !config.output.export_csv);
        assert_eq!(config.params.support, SupportRegion::Ratio(0.02));
        assert_eq!(config.params.conf_post_filt, 0.5);
    }
}
