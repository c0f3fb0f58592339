//! Owned single-channel f32 field with symmetric boundary margins.
//!
//! The logical extent is `w × h`; `bx` and `by` extra cells surround it on
//! every side so that finite-difference stencils can read one (or more)
//! samples past the border without bounds checks. Storage is row-major with
//! `stride = w + 2·bx`.
//!
//! Interior pixels are addressed with `(x, y) ∈ [0, w) × [0, h)` through
//! [`ImageF32::get`]/[`ImageF32::set`]. Margin cells use signed coordinates
//! through [`ImageF32::at`]/[`ImageF32::set_at`], with `x ∈ [-bx, w + bx)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Logical width in pixels
    pub w: usize,
    /// Logical height in pixels
    pub h: usize,
    /// Margin cells on the left and right
    pub bx: usize,
    /// Margin cells on the top and bottom
    pub by: usize,
    /// Number of f32 elements between consecutive rows (`w + 2·bx`)
    pub stride: usize,
    /// Backing storage in row-major order, margins included
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Zero-initialized buffer of size `w × h` without margins.
    pub fn new(w: usize, h: usize) -> Self {
        Self::with_border(w, h, 0, 0)
    }

    /// Zero-initialized buffer of size `w × h` with margins `bx`, `by`.
    pub fn with_border(w: usize, h: usize, bx: usize, by: usize) -> Self {
        let stride = w + 2 * bx;
        Self {
            w,
            h,
            bx,
            by,
            stride,
            data: vec![0.0; stride * (h + 2 * by)],
        }
    }

    /// Zero-initialized buffer sharing this buffer's extent and margins.
    pub fn zeros_like(&self) -> Self {
        Self::with_border(self.w, self.h, self.bx, self.by)
    }

    /// Build a bordered buffer by evaluating `f(x, y)` on every interior pixel.
    pub fn from_fn<F>(w: usize, h: usize, bx: usize, by: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut out = Self::with_border(w, h, bx, by);
        for y in 0..h {
            let row = out.row_mut_internal(y);
            for (x, px) in row.iter_mut().enumerate() {
                *px = f(x, y);
            }
        }
        out
    }

    /// Copy the interior of `src` into a new buffer with margins `bx`, `by`.
    pub fn rebordered(src: &ImageF32, bx: usize, by: usize) -> Self {
        let mut out = Self::with_border(src.w, src.h, bx, by);
        for y in 0..src.h {
            let start = out.index(0, y);
            out.data[start..start + src.w].copy_from_slice(src.interior_row(y));
        }
        out
    }

    /// Whether `other` has identical extent, margins and stride.
    #[inline]
    pub fn same_layout(&self, other: &ImageF32) -> bool {
        self.w == other.w && self.h == other.h && self.bx == other.bx && self.by == other.by
    }

    #[inline]
    /// Convert an interior (x, y) to a linear index into `data`.
    pub fn index(&self, x: usize, y: usize) -> usize {
        (y + self.by) * self.stride + x + self.bx
    }

    #[inline]
    /// Convert a signed (x, y), margins included, to a linear index into `data`.
    pub fn index_signed(&self, x: isize, y: isize) -> usize {
        let px = x + self.bx as isize;
        let py = y + self.by as isize;
        debug_assert!(
            px >= 0 && py >= 0 && (px as usize) < self.stride,
            "({x}, {y}) lies outside the bordered buffer"
        );
        py as usize * self.stride + px as usize
    }

    #[inline]
    /// Get the interior pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    /// Set the interior pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.index(x, y);
        self.data[i] = v;
    }

    #[inline]
    /// Get a value by signed coordinates; margins are reachable.
    pub fn at(&self, x: isize, y: isize) -> f32 {
        self.data[self.index_signed(x, y)]
    }

    #[inline]
    /// Set a value by signed coordinates; margins are reachable.
    pub fn set_at(&mut self, x: isize, y: isize, v: f32) {
        let i = self.index_signed(x, y);
        self.data[i] = v;
    }

    /// Fill every cell, margins included.
    pub fn fill(&mut self, v: f32) {
        self.data.iter_mut().for_each(|px| *px = v);
    }

    /// Interior-wise `self += other`. Margins are left untouched.
    pub fn add_assign(&mut self, other: &ImageF32) {
        assert!(
            self.w == other.w && self.h == other.h,
            "cannot add {}x{} field to {}x{} field",
            other.w,
            other.h,
            self.w,
            self.h
        );
        for y in 0..self.h {
            let src = other.interior_row(y);
            let dst = self.row_mut_internal(y);
            for (d, s) in dst.iter_mut().zip(src) {
                *d += *s;
            }
        }
    }

    /// Mean over the interior.
    pub fn mean(&self) -> f32 {
        let n = (self.w * self.h).max(1) as f64;
        let sum: f64 = (0..self.h)
            .map(|y| self.interior_row(y).iter().map(|&v| v as f64).sum::<f64>())
            .sum();
        (sum / n) as f32
    }

    #[inline]
    fn interior_row(&self, y: usize) -> &[f32] {
        let start = self.index(0, y);
        &self.data[start..start + self.w]
    }

    #[inline]
    fn row_mut_internal(&mut self, y: usize) -> &mut [f32] {
        let start = self.index(0, y);
        let w = self.w;
        &mut self.data[start..start + w]
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
        self.interior_row(y)
    }
    #[inline]
    fn as_slice(&self) -> Option<&[f32]> {
        (self.bx == 0 && self.by == 0).then_some(&self.data[..self.w * self.h])
    }
}

impl crate::image::traits::ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        self.row_mut_internal(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageView;

    #[test]
    fn interior_and_signed_indexing_agree() {
        let mut img = ImageF32::with_border(4, 3, 2, 1);
        assert_eq!(img.stride, 8);
        assert_eq!(img.data.len(), 8 * 5);
        img.set(1, 2, 7.0);
        assert_eq!(img.at(1, 2), 7.0);
        img.set_at(-2, -1, 3.0);
        assert_eq!(img.data[0], 3.0);
        img.set_at(5, 3, 4.0);
        assert_eq!(*img.data.last().unwrap(), 4.0);
    }

    #[test]
    fn rows_skip_margins() {
        let img = ImageF32::from_fn(3, 2, 1, 1, |x, y| (10 * y + x) as f32);
        assert_eq!(img.row(1), &[10.0, 11.0, 12.0]);
        assert!(img.as_slice().is_none());
        assert!((img.mean() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn rebordered_keeps_interior() {
        let src = ImageF32::from_fn(5, 4, 0, 0, |x, y| (x * y) as f32);
        let dst = ImageF32::rebordered(&src, 2, 3);
        for y in 0..4 {
            assert_eq!(src.row(y), dst.row(y));
        }
        assert_eq!(dst.at(-2, -3), 0.0);
    }
}
