//! Owned single-channel f32 grid in row-major layout (stride == width).
//!
//! Backs every per-view raster in the crate: depth maps, confidence maps and
//! the reprojected buffers. A value `<= 0` in a depth map means "no estimate".
#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Grid width in pixels
    pub w: usize,
    /// Grid height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

/// Per-pixel depth along the camera z axis.
pub type DepthMap = ImageF32;
/// Per-pixel confidence paired with a [`DepthMap`].
pub type ConfidenceMap = ImageF32;

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    /// Construct a buffer of size `w × h` with every pixel set to `value`.
    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// Wrap an existing row-major buffer. Returns `None` when `data.len() != w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == w * h).then_some(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    /// `(width, height)` of the grid.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Copy the `size × size` window centred on (x, y) into `out` (row-major).
    ///
    /// The caller guarantees the window lies fully inside the grid.
    pub fn window_into(&self, x: usize, y: usize, size: usize, out: &mut Vec<f32>) {
        let half = size / 2;
        out.clear();
        for yy in (y - half)..=(y + half) {
            let start = self.idx(x - half, yy);
            out.extend_from_slice(&self.data[start..start + size]);
        }
    }

    /// Largest finite value in the grid, or `None` if the grid is empty.
    pub fn max_value(&self) -> Option<f32> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }
}

impl crate::image::traits::ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_copies_rows_in_order() {
        let data: Vec<f32> = (0..25).map(|v| v as f32).collect();
        let img = ImageF32::from_vec(5, 5, data).unwrap();
        let mut win = Vec::new();
        img.window_into(2, 2, 3, &mut win);
        assert_eq!(win, vec![6.0, 7.0, 8.0, 11.0, 12.0, 13.0, 16.0, 17.0, 18.0]);
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(ImageF32::from_vec(2, 2, vec![0.0; 3]).is_none());
        assert!(ImageF32::from_vec(2, 2, vec![0.0; 4]).is_some());
    }
}
