//! Colored point clouds from fused depth maps and their ASCII PLY encoding.
use crate::camera::CameraModel;
use crate::error::DatasetError;
use crate::image::io::{ensure_parent_dir, ColorImage};
use crate::types::FusionResult;
use rayon::prelude::*;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Color used when no view image is available.
pub const DEFAULT_COLOR: [u8; 3] = [255, 255, 255];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColoredPoint {
    pub position: [f32; 3],
    pub color: [u8; 3],
}

/// Lift every pixel with a positive fused depth into world space with the
/// reference `camera`. Points are emitted in row-major pixel order.
pub fn back_project_result(
    result: &FusionResult,
    camera: &CameraModel,
    colors: Option<&ColorImage>,
) -> Vec<ColoredPoint> {
    let w = result.width();
    let colors = colors.filter(|img| img.w == w && img.h == result.height());
    result
        .depth
        .data
        .par_chunks(w)
        .enumerate()
        .flat_map_iter(|(row, depth_row)| {
            depth_row
                .iter()
                .enumerate()
                .filter(|(_, d)| **d > 0.0)
                .map(move |(col, &d)| {
                    let p = camera.back_project(col as f64, row as f64, d as f64);
                    ColoredPoint {
                        position: [p.x as f32, p.y as f32, p.z as f32],
                        color: colors.map_or(DEFAULT_COLOR, |img| img.get(col, row)),
                    }
                })
        })
        .collect()
}

/// Concatenate per-view clouds in view order.
pub fn merge_point_clouds(
    clouds: impl IntoIterator<Item = Vec<ColoredPoint>>,
) -> Vec<ColoredPoint> {
    let mut merged = Vec::new();
    for cloud in clouds {
        merged.extend(cloud);
    }
    merged
}

/// Write `points` as an ASCII PLY with float positions and uchar colors.
pub fn write_ply(path: &Path, points: &[ColoredPoint]) -> Result<(), DatasetError> {
    ensure_parent_dir(path)?;
    let file = fs::File::create(path).map_err(|e| DatasetError::io(path, e))?;
    let mut out = BufWriter::new(file);
    encode_ply(&mut out, points).map_err(|e| DatasetError::io(path, e))
}

fn encode_ply<W: Write>(out: &mut W, points: &[ColoredPoint]) -> std::io::Result<()> {
    writeln!(out, "ply")?;
    writeln!(out, "format ascii 1.0")?;
    writeln!(out, "element vertex {}", points.len())?;
    writeln!(out, "property float x")?;
    writeln!(out, "property float y")?;
    writeln!(out, "property float z")?;
    writeln!(out, "property uchar red")?;
    writeln!(out, "property uchar green")?;
    writeln!(out, "property uchar blue")?;
    writeln!(out, "element face 0")?;
    writeln!(out, "end_header")?;
    for p in points {
        let [x, y, z] = p.position;
        let [r, g, b] = p.color;
        writeln!(out, "{x} {y} {z} {r} {g} {b}")?;
    }
    out.flush()
}
