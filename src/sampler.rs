//! Calibrated pixel access.
//!
//! All analysis code works in *logical* coordinates: `x` runs along the axis
//! that was resampled. In rotated mode the grid is read transposed, so a
//! vertically resized pattern can be measured with the horizontal code paths.

use imgref::ImgRef;
use rgb::RGB8;

use crate::color::ColorSpace;

/// Reads calibrated intensities from a decoded image.
#[derive(Clone, Copy)]
pub struct Sampler<'a> {
    grid: ImgRef<'a, RGB8>,
    color: ColorSpace,
    rotated: bool,
}

impl<'a> Sampler<'a> {
    /// Create a sampler over `grid`.
    #[must_use]
    pub fn new(grid: ImgRef<'a, RGB8>, color: ColorSpace, rotated: bool) -> Self {
        Self {
            grid,
            color,
            rotated,
        }
    }

    /// Logical width (the resampled axis).
    #[must_use]
    pub fn width(&self) -> usize {
        if self.rotated {
            self.grid.height()
        } else {
            self.grid.width()
        }
    }

    /// Logical height.
    #[must_use]
    pub fn height(&self) -> usize {
        if self.rotated {
            self.grid.width()
        } else {
            self.grid.height()
        }
    }

    /// Calibrated intensity (0-255 scale, 50 = dark, 250 = light) at logical `(x, y)`.
    ///
    /// Callers must stay within `[0, width) x [0, height)`.
    #[must_use]
    pub fn sample(&self, x: usize, y: usize) -> f64 {
        let (px, py) = self.to_physical(x, y);
        self.color.correct(self.grid[(px, py)].g)
    }

    fn to_physical(&self, x: usize, y: usize) -> (usize, usize) {
        if self.rotated { (y, x) } else { (x, y) }
    }
}
