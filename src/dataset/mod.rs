//! On-disk MVS datasets.
//!
//! A dataset root holds one file per view in each of `depth_maps/`,
//! `conf_maps/` (CSV grids) and `cams/` (camera text files), optionally
//! `images/` for point colors, and a `pair.txt` view selection. Files are
//! matched to views by sorted file name.

pub mod cams;
pub mod csv;
pub mod pairs;

pub use cams::{read_camera_file, read_camera_params, CameraParams};
pub use csv::{read_csv_map, write_csv_map};
pub use pairs::read_pair_file;

use crate::camera::{CameraModel, DepthRange};
use crate::error::{DatasetError, FusionError};
use crate::fusion::FusionInputs;
use crate::image::io::{load_color_image, ColorImage};
use crate::image::{ConfidenceMap, DepthMap};
use crate::views::ViewSet;
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory names and view-selection options of a dataset.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DatasetLayout {
    pub depth_dir: String,
    pub conf_dir: String,
    pub cams_dir: String,
    pub images_dir: String,
    pub pair_file: String,
    /// Supporting views kept per reference from the pair file.
    pub max_supporting: usize,
    /// Put the reference view first in its own supporting list.
    pub include_reference: bool,
    /// Scale applied to the intrinsics when maps are stored at a different
    /// resolution than the cameras were calibrated at.
    pub intrinsics_scale: Option<f64>,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            depth_dir: "depth_maps".into(),
            conf_dir: "conf_maps".into(),
            cams_dir: "cams".into(),
            images_dir: "images".into(),
            pair_file: "pair.txt".into(),
            max_supporting: 4,
            include_reference: true,
            intrinsics_scale: None,
        }
    }
}

/// Every view of a dataset loaded into memory.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub root: PathBuf,
    pub depth: Vec<DepthMap>,
    pub confidence: Vec<ConfidenceMap>,
    pub cameras: Vec<CameraModel>,
    pub depth_ranges: Vec<DepthRange>,
    pub images: Option<Vec<ColorImage>>,
    pub views: ViewSet,
}

impl Dataset {
    pub fn load(root: &Path, layout: &DatasetLayout) -> Result<Self, DatasetError> {
        let depth_files = list_files(&root.join(&layout.depth_dir))?;
        let conf_files = list_files(&root.join(&layout.conf_dir))?;
        let cam_files = list_files(&root.join(&layout.cams_dir))?;
        if depth_files.is_empty() {
            return Err(DatasetError::Layout {
                root: root.to_path_buf(),
                message: format!("no depth maps in {}", layout.depth_dir),
            });
        }
        info!(
            "loading {} views from {}",
            depth_files.len(),
            root.display()
        );

        let depth = depth_files
            .iter()
            .map(|p| read_csv_map(p))
            .collect::<Result<Vec<_>, _>>()?;
        let confidence = conf_files
            .iter()
            .map(|p| read_csv_map(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut cameras = Vec::with_capacity(cam_files.len());
        let mut depth_ranges = Vec::with_capacity(cam_files.len());
        for (view, path) in cam_files.iter().enumerate() {
            let params = read_camera_params(path)?;
            let camera = params
                .camera()
                .and_then(|cam| match layout.intrinsics_scale {
                    Some(scale) => cam.scaled(scale),
                    None => Ok(cam),
                })
                .map_err(|source| FusionError::Camera { view, source })?;
            cameras.push(camera);
            depth_ranges.push(params.depth_range);
        }

        let images_dir = root.join(&layout.images_dir);
        let images = if images_dir.is_dir() {
            let files = list_files(&images_dir)?;
            if files.len() == depth.len() {
                Some(
                    files
                        .iter()
                        .map(|p| load_color_image(p))
                        .collect::<Result<Vec<_>, _>>()?,
                )
            } else {
                warn!(
                    "{} images for {} views, points will be uncolored",
                    files.len(),
                    depth.len()
                );
                None
            }
        } else {
            None
        };

        let pair_path = root.join(&layout.pair_file);
        let views = if pair_path.is_file() {
            read_pair_file(&pair_path, layout.max_supporting, layout.include_reference)?
        } else {
            warn!(
                "{} not found, every view supports every reference",
                pair_path.display()
            );
            ViewSet::all(depth.len())
        };

        let dataset = Self {
            root: root.to_path_buf(),
            depth,
            confidence,
            cameras,
            depth_ranges,
            images,
            views,
        };
        dataset.inputs()?;
        Ok(dataset)
    }

    pub fn num_views(&self) -> usize {
        self.depth.len()
    }

    /// Borrow the maps and cameras as validated fusion inputs.
    pub fn inputs(&self) -> Result<FusionInputs<'_>, FusionError> {
        FusionInputs::new(&self.depth, &self.confidence, &self.cameras)
    }

    pub fn image(&self, view: usize) -> Option<&ColorImage> {
        self.images.as_ref().and_then(|images| images.get(view))
    }
}

/// Regular, non-hidden files of `dir` sorted by name.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let entries = fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DatasetError::io(dir, e))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
