//! I/O helpers for rasters and JSON.
//!
//! - `load_color_image`: read a PNG/JPEG into an owned RGB buffer used to color
//!   point clouds.
//! - `save_depth_png`: write a depth map normalized by its maximum.
//! - `save_confidence_png`: write a confidence map scaled from [0, 1].
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageView};
use crate::error::DatasetError;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit RGB buffer in row-major order.
#[derive(Clone, Debug)]
pub struct ColorImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<[u8; 3]>,
}

impl ColorImage {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        self.data[y * self.w + x]
    }
}

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_color_image(path: &Path) -> Result<ColorImage, DatasetError> {
    let img = image::open(path)
        .map_err(|source| DatasetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgb8();
    let w = img.width() as usize;
    let h = img.height() as usize;
    let data = img.pixels().map(|p| p.0).collect();
    Ok(ColorImage { w, h, data })
}

/// Save a depth map as grayscale PNG, scaled so the largest depth maps to 255.
/// Holes and missing estimates render black.
pub fn save_depth_png(depth: &ImageF32, path: &Path) -> Result<(), DatasetError> {
    let max = depth.max_value().filter(|m| *m > 0.0).unwrap_or(1.0);
    save_scaled(depth, 255.0 / max, path)
}

/// Save a confidence map as grayscale PNG, mapping [0, 1] to [0, 255].
pub fn save_confidence_png(confidence: &ImageF32, path: &Path) -> Result<(), DatasetError> {
    save_scaled(confidence, 255.0, path)
}

fn save_scaled(image: &ImageF32, scale: f32, path: &Path) -> Result<(), DatasetError> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = if px > 0.0 {
                (px * scale).clamp(0.0, 255.0)
            } else {
                0.0
            };
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path).map_err(|source| DatasetError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), DatasetError> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|e| DatasetError::io(path, e))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
        }
    }
    Ok(())
}
