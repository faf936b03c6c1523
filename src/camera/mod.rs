//! Pinhole camera model with world ↔ pixel projection primitives.
//!
//! Convention
//! - The extrinsic matrix `P = [R | t; 0 0 0 1]` maps world to camera
//!   coordinates; the camera centre is `C = -Rᵀt`.
//! - A pixel `(c, r)` observed at depth `d` is lifted to the homogeneous
//!   camera-space vector `[d·c, d·r, d, 1]`, i.e. the pixel scaled by depth.
//!   Back-projection applies `K⁻¹` then `P⁻¹`; forward-projection applies `P`
//!   then `K` and divides by the third component. Both directions use this
//!   parameterization only.
//! - Projected depth is the z component of `R (X - C)`, the distance along the
//!   optical axis, not the Euclidean range.
//!
//! All geometry runs in `f64`; grids stay `f32`.

mod model;

pub use model::{CameraError, CameraModel, DepthRange, PixelProjection};

use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

pub type Real = f64;

pub type Vec3 = Vector3<Real>;
pub type Vec4 = Vector4<Real>;
pub type Pt3 = Point3<Real>;
pub type Mat3 = Matrix3<Real>;
pub type Mat4 = Matrix4<Real>;

/// Embed a 3×3 intrinsic matrix into the 4×4 homogeneous form
/// `[K 0; 0 0 0 1]` used by the projection chain.
pub fn augment_intrinsics(k: &Mat3) -> Mat4 {
    let mut aug = Mat4::identity();
    aug.fixed_view_mut::<3, 3>(0, 0).copy_from(k);
    aug
}
