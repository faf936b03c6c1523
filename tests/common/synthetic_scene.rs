//! Fronto-parallel plane seen by cameras translated along x.
//!
//! Intrinsics and depths are powers of two so every projection round trip is
//! exact in floating point: a view `baseline` units to the right of the
//! reference sees the plane shifted by `baseline / 2` pixels.
use depth_fusion::camera::{CameraModel, Mat3, Vec3};
use depth_fusion::image::{ConfidenceMap, DepthMap, ImageF32};
use depth_fusion::FusionInputs;

pub const WIDTH: usize = 32;
pub const HEIGHT: usize = 32;
pub const FOCAL: f64 = 256.0;
pub const PLANE_DEPTH: f32 = 512.0;

pub fn intrinsics() -> Mat3 {
    let c = (WIDTH / 2) as f64;
    Mat3::new(FOCAL, 0.0, c, 0.0, FOCAL, c, 0.0, 0.0, 1.0)
}

/// Camera whose centre sits at `(baseline, 0, 0)` looking down +z.
pub fn camera_at(baseline: f64) -> CameraModel {
    CameraModel::from_pose(intrinsics(), Mat3::identity(), Vec3::new(-baseline, 0.0, 0.0))
        .expect("valid synthetic camera")
}

pub struct Scene {
    pub depth: Vec<DepthMap>,
    pub confidence: Vec<ConfidenceMap>,
    pub cameras: Vec<CameraModel>,
    pub baselines: Vec<f64>,
}

impl Scene {
    /// One view per confidence, view `i` at baseline `2i` (one pixel apart).
    pub fn plane(confidences: &[f32]) -> Self {
        let baselines: Vec<f64> = (0..confidences.len()).map(|i| 2.0 * i as f64).collect();
        Self {
            depth: vec![ImageF32::filled(WIDTH, HEIGHT, PLANE_DEPTH); confidences.len()],
            confidence: confidences
                .iter()
                .map(|&c| ImageF32::filled(WIDTH, HEIGHT, c))
                .collect(),
            cameras: baselines.iter().map(|&b| camera_at(b)).collect(),
            baselines,
        }
    }

    /// Perturb depths with a fixed per-pixel pattern so that neighbouring
    /// samples collide after reprojection.
    pub fn with_ripples(mut self) -> Self {
        for (v, map) in self.depth.iter_mut().enumerate() {
            for y in 0..HEIGHT {
                for x in 0..WIDTH {
                    let bump = ((x * 7 + y * 13 + v * 5) % 9) as f32 * 0.75;
                    map.set(x, y, PLANE_DEPTH + bump);
                }
            }
        }
        self
    }

    pub fn inputs(&self) -> FusionInputs<'_> {
        FusionInputs::new(&self.depth, &self.confidence, &self.cameras)
            .expect("consistent synthetic scene")
    }

    /// Camera file text of view `view` in the dataset layout.
    pub fn camera_file(&self, view: usize) -> String {
        let b = self.baselines[view];
        let c = WIDTH / 2;
        format!(
            "extrinsic\n1 0 0 {}\n0 1 0 0\n0 0 1 0\n0 0 0 1\n\n\
             intrinsic\n{FOCAL} 0 {c}\n0 {FOCAL} {c}\n0 0 1\n\n425 2.5\n",
            -b
        )
    }
}
