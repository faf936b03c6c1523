use crate::camera::CameraModel;
use crate::error::FusionError;
use crate::image::{ConfidenceMap, DepthMap, ImageView};

/// Borrowed per-view inputs of a fusion run, validated once up front.
///
/// All maps share one size; index `i` of every slice belongs to view `i`.
#[derive(Clone, Copy, Debug)]
pub struct FusionInputs<'a> {
    depth: &'a [DepthMap],
    confidence: &'a [ConfidenceMap],
    cameras: &'a [CameraModel],
    width: usize,
    height: usize,
}

impl<'a> FusionInputs<'a> {
    pub fn new(
        depth: &'a [DepthMap],
        confidence: &'a [ConfidenceMap],
        cameras: &'a [CameraModel],
    ) -> Result<Self, FusionError> {
        let first = depth.first().ok_or(FusionError::NoViews)?;
        if confidence.len() != depth.len() || cameras.len() != depth.len() {
            return Err(FusionError::ViewCountMismatch {
                depth: depth.len(),
                confidence: confidence.len(),
                cameras: cameras.len(),
            });
        }
        let (width, height) = first.dims();
        if width == 0 || height == 0 {
            return Err(FusionError::EmptyGrid { width, height });
        }
        if u32::try_from(width * height).is_err() {
            return Err(FusionError::GridTooLarge {
                pixels: width * height,
            });
        }
        for (view, (d, c)) in depth.iter().zip(confidence).enumerate() {
            for (what, map) in [("depth map", d), ("confidence map", c)] {
                if map.dims() != (width, height) || !map.is_contiguous() {
                    return Err(FusionError::DimensionMismatch {
                        view,
                        what,
                        expected: (width, height),
                        found: map.dims(),
                    });
                }
            }
        }
        Ok(Self {
            depth,
            confidence,
            cameras,
            width,
            height,
        })
    }

    pub fn num_views(&self) -> usize {
        self.depth.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self, view: usize) -> &'a DepthMap {
        &self.depth[view]
    }

    pub fn confidence(&self, view: usize) -> &'a ConfidenceMap {
        &self.confidence[view]
    }

    pub fn camera(&self, view: usize) -> &'a CameraModel {
        &self.cameras[view]
    }
}
