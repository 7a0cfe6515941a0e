//! Spatial transforms applied to a loaded pair.
//!
//! Arrays arrive as (height, width, channels) and leave as
//! (channels, height, width) `f32` in standard layout.

use ndarray::{Array3, ArrayView3, s};
use rand::Rng;

use crate::error::{DatasetError, Result};

/// A square window inside an (H × W) sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    /// First row of the window
    pub top: usize,
    /// First column of the window
    pub left: usize,
    /// Side length
    pub size: usize,
}

impl CropWindow {
    /// Draw a window uniformly from every position that fits.
    ///
    /// `top` is drawn from `0..=height - size` and `left` from
    /// `0..=width - size`.
    pub fn random<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if size == 0 || size > height || size > width {
            return Err(DatasetError::CropTooLarge {
                crop_size: size,
                height,
                width,
            });
        }
        let top = rng.gen_range(0..=height - size);
        let left = rng.gen_range(0..=width - size);
        Ok(Self { top, left, size })
    }

    /// View of the window in an (H × W × C) array.
    ///
    /// The caller guarantees the window fits; `random` only yields windows
    /// that fit the dimensions it was given.
    pub fn apply<'a, A>(&self, array: ArrayView3<'a, A>) -> ArrayView3<'a, A> {
        array.slice_move(s![
            self.top..self.top + self.size,
            self.left..self.left + self.size,
            ..
        ])
    }
}

/// Convert an (H × W × C) array to a contiguous (C × H × W) `f32` array.
pub fn to_chw(hwc: ArrayView3<'_, f64>) -> Array3<f32> {
    let (height, width, channels) = hwc.dim();
    Array3::from_shape_fn((channels, height, width), |(c, y, x)| hwc[[y, x, c]] as f32)
}
