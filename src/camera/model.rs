use super::{augment_intrinsics, Mat3, Mat4, Pt3, Real, Vec3, Vec4};
use thiserror::Error;

const DET_EPS: Real = 1e-12;
const ORTHONORMAL_TOL: Real = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum CameraError {
    #[error("intrinsic matrix is singular")]
    SingularIntrinsics,
    #[error("extrinsic matrix is singular")]
    SingularExtrinsics,
    #[error("rotation is not orthonormal (max |RᵀR - I| = {deviation:.3e})")]
    NonOrthonormalRotation { deviation: Real },
}

/// Depth sampling range stored alongside a camera (`min` and step size).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DepthRange {
    pub min: f32,
    pub interval: f32,
}

/// A world point projected into a camera grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelProjection {
    /// Column (x) of the pixel containing the projection.
    pub col: usize,
    /// Row (y) of the pixel containing the projection.
    pub row: usize,
    /// z-depth of the point in this camera's frame.
    pub depth: Real,
}

/// Immutable intrinsics + extrinsics of one view with cached inverses.
#[derive(Clone, Debug)]
pub struct CameraModel {
    k: Mat3,
    extrinsic: Mat4,
    rotation: Mat3,
    center: Vec3,
    /// `K_aug · P`
    world_to_pixel: Mat4,
    /// `P⁻¹ · K_aug⁻¹`
    pixel_to_world: Mat4,
}

impl CameraModel {
    /// Build a camera from `K` (3×3) and `P` (4×4 world→camera).
    ///
    /// Fails when either matrix is singular or the rotation block is not
    /// orthonormal.
    pub fn new(k: Mat3, extrinsic: Mat4) -> Result<Self, CameraError> {
        if k.determinant().abs() <= DET_EPS {
            return Err(CameraError::SingularIntrinsics);
        }
        let k_inv = k.try_inverse().ok_or(CameraError::SingularIntrinsics)?;
        if extrinsic.determinant().abs() <= DET_EPS {
            return Err(CameraError::SingularExtrinsics);
        }
        let extrinsic_inv = extrinsic
            .try_inverse()
            .ok_or(CameraError::SingularExtrinsics)?;

        let rotation: Mat3 = extrinsic.fixed_view::<3, 3>(0, 0).into_owned();
        let translation: Vec3 = extrinsic.fixed_view::<3, 1>(0, 3).into_owned();
        let deviation = (rotation.transpose() * rotation - Mat3::identity()).amax();
        if deviation > ORTHONORMAL_TOL {
            return Err(CameraError::NonOrthonormalRotation { deviation });
        }
        let center = -(rotation.transpose() * translation);

        Ok(Self {
            k,
            extrinsic,
            rotation,
            center,
            world_to_pixel: augment_intrinsics(&k) * extrinsic,
            pixel_to_world: extrinsic_inv * augment_intrinsics(&k_inv),
        })
    }

    /// Build a camera from a rotation and translation (`x_cam = R x_world + t`).
    pub fn from_pose(k: Mat3, rotation: Mat3, translation: Vec3) -> Result<Self, CameraError> {
        let mut extrinsic = Mat4::identity();
        extrinsic.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        extrinsic.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self::new(k, extrinsic)
    }

    /// Same pose with focal lengths and principal point multiplied by `scale`,
    /// matching a map resampled by the same factor.
    pub fn scaled(&self, scale: Real) -> Result<Self, CameraError> {
        let mut k = self.k;
        k[(0, 0)] *= scale;
        k[(1, 1)] *= scale;
        k[(0, 2)] *= scale;
        k[(1, 2)] *= scale;
        Self::new(k, self.extrinsic)
    }

    pub fn intrinsics(&self) -> &Mat3 {
        &self.k
    }

    pub fn extrinsics(&self) -> &Mat4 {
        &self.extrinsic
    }

    pub fn rotation(&self) -> &Mat3 {
        &self.rotation
    }

    /// Camera centre `C = -Rᵀt` in world coordinates.
    pub fn center(&self) -> &Vec3 {
        &self.center
    }

    /// Lift pixel `(col, row)` at `depth` to a world point.
    #[inline]
    pub fn back_project(&self, col: Real, row: Real, depth: Real) -> Pt3 {
        let x = self.pixel_to_world * Vec4::new(depth * col, depth * row, depth, 1.0);
        Pt3::new(x.x / x.w, x.y / x.w, x.z / x.w)
    }

    /// z-depth of a world point in this camera's frame.
    #[inline]
    pub fn depth_of(&self, point: &Pt3) -> Real {
        (self.rotation * (point.coords - self.center)).z
    }

    /// Continuous pixel coordinates `(u, v)` and z-depth of a world point.
    /// Returns `None` when the point lies in the camera's principal plane.
    #[inline]
    pub fn project(&self, point: &Pt3) -> Option<(Real, Real, Real)> {
        let x = self.world_to_pixel * point.to_homogeneous();
        if x.z == 0.0 {
            return None;
        }
        let u = x.x / x.z;
        let v = x.y / x.z;
        if !u.is_finite() || !v.is_finite() {
            return None;
        }
        Some((u, v, self.depth_of(point)))
    }

    /// Project a world point and floor it to a pixel of a `width × height`
    /// grid. Points outside the grid return `None`.
    #[inline]
    pub fn project_to_grid(
        &self,
        point: &Pt3,
        width: usize,
        height: usize,
    ) -> Option<PixelProjection> {
        let (u, v, depth) = self.project(point)?;
        let col = u.floor();
        let row = v.floor();
        if col < 0.0 || row < 0.0 || col >= width as Real || row >= height as Real {
            return None;
        }
        Some(PixelProjection {
            col: col as usize,
            row: row as usize,
            depth,
        })
    }
}
