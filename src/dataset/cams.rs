//! MVSNet-style camera text files.
//!
//! ```text
//! extrinsic
//! r11 r12 r13 t1
//! r21 r22 r23 t2
//! r31 r32 r33 t3
//! 0 0 0 1
//!
//! intrinsic
//! fx 0 cx
//! 0 fy cy
//! 0 0 1
//!
//! depth_min depth_interval [...]
//! ```
use crate::camera::{CameraError, CameraModel, DepthRange, Mat3, Mat4};
use crate::error::DatasetError;
use std::fs;
use std::path::Path;

/// Raw matrices of one camera file, before validation.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraParams {
    pub intrinsic: Mat3,
    pub extrinsic: Mat4,
    pub depth_range: DepthRange,
}

impl CameraParams {
    pub fn camera(&self) -> Result<CameraModel, CameraError> {
        CameraModel::new(self.intrinsic, self.extrinsic)
    }
}

/// Parse a camera file and build the validated camera model.
pub fn read_camera_file(path: &Path) -> Result<(CameraModel, DepthRange), DatasetError> {
    let params = read_camera_params(path)?;
    let camera = params.camera().map_err(|source| DatasetError::Camera {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((camera, params.depth_range))
}

/// Parse a camera file without validating the matrices.
pub fn read_camera_params(path: &Path) -> Result<CameraParams, DatasetError> {
    let text = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    parse_camera(&text).map_err(|(line, message)| DatasetError::parse(path, line, message))
}

/// Non-blank lines with their 1-based line numbers.
struct Cursor<'t> {
    lines: Vec<(usize, &'t str)>,
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn new(text: &'t str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty())
            .collect();
        Self { lines, pos: 0 }
    }

    fn next(&mut self) -> Option<(usize, &'t str)> {
        let line = self.lines.get(self.pos).copied();
        self.pos += 1;
        line
    }

    fn is_done(&self) -> bool {
        self.pos >= self.lines.len()
    }

    fn expect_tag(&mut self, tag: &str) -> Result<(), (usize, String)> {
        match self.next() {
            Some((_, l)) if l.eq_ignore_ascii_case(tag) => Ok(()),
            Some((i, l)) => Err((i, format!("expected '{tag}', found {l:?}"))),
            None => Err((0, format!("missing '{tag}' section"))),
        }
    }

    /// Whitespace-separated numbers of the next line.
    fn numbers(&mut self) -> Result<(usize, Vec<f64>), (usize, String)> {
        let (line, text) = self
            .next()
            .ok_or((0, "unexpected end of file".to_string()))?;
        let values = text
            .split_whitespace()
            .map(|t| t.parse::<f64>().map_err(|_| (line, format!("invalid number {t:?}"))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((line, values))
    }

    fn row(&mut self, count: usize) -> Result<Vec<f64>, (usize, String)> {
        let (line, values) = self.numbers()?;
        if values.len() != count {
            return Err((line, format!("expected {count} values, found {}", values.len())));
        }
        Ok(values)
    }
}

fn parse_camera(text: &str) -> Result<CameraParams, (usize, String)> {
    let mut cursor = Cursor::new(text);

    cursor.expect_tag("extrinsic")?;
    let mut extrinsic = Mat4::zeros();
    for r in 0..4 {
        for (c, v) in cursor.row(4)?.into_iter().enumerate() {
            extrinsic[(r, c)] = v;
        }
    }

    cursor.expect_tag("intrinsic")?;
    let mut intrinsic = Mat3::zeros();
    for r in 0..3 {
        for (c, v) in cursor.row(3)?.into_iter().enumerate() {
            intrinsic[(r, c)] = v;
        }
    }

    let depth_range = if cursor.is_done() {
        DepthRange::default()
    } else {
        let (line, values) = cursor.numbers()?;
        if values.len() < 2 {
            return Err((line, "expected depth_min and depth_interval".into()));
        }
        DepthRange {
            min: values[0] as f32,
            interval: values[1] as f32,
        }
    };

    Ok(CameraParams {
        intrinsic,
        extrinsic,
        depth_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAM: &str = "extrinsic
1 0 0 0.5
0 1 0 0
0 0 1 2
0 0 0 1

intrinsic
100 0 32
0 100 24
0 0 1

425 2.5 192 933.8
";

    #[test]
    fn parses_matrices_and_depth_range() {
        let p = parse_camera(CAM).unwrap();
        assert_eq!(p.extrinsic[(0, 3)], 0.5);
        assert_eq!(p.extrinsic[(2, 3)], 2.0);
        assert_eq!(p.intrinsic[(1, 2)], 24.0);
        assert_eq!(
            p.depth_range,
            DepthRange {
                min: 425.0,
                interval: 2.5
            }
        );
        let cam = p.camera().unwrap();
        assert_eq!(cam.center().z, -2.0);
    }

    #[test]
    fn depth_line_is_optional() {
        let text = CAM.lines().take(10).collect::<Vec<_>>().join("\n");
        assert_eq!(parse_camera(&text).unwrap().depth_range, DepthRange::default());
    }

    #[test]
    fn short_row_is_reported_with_line_number() {
        let text = CAM.replacen("0 1 0 0\n", "0 1 0\n", 1);
        let err = parse_camera(&text).unwrap_err();
        assert_eq!(err.0, 3);
        let err = parse_camera("intrinsic\n").unwrap_err();
        assert_eq!(err.0, 1);
    }
}
