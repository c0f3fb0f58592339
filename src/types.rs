use crate::diagnostics::FlowReport;
use crate::image::{mirror_bounds, set_bounds, ImageF32};
use crate::pyramid::resample::resample;

/// Dense displacement field `(u, v)` in physical units.
///
/// At the finest level with unit grid spacing the components are pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowField {
    /// Horizontal displacement
    pub u: ImageF32,
    /// Vertical displacement
    pub v: ImageF32,
}

impl FlowField {
    /// All-zero field of size `w × h` with margins `bx`, `by`.
    pub fn zeros(w: usize, h: usize, bx: usize, by: usize) -> Self {
        Self {
            u: ImageF32::with_border(w, h, bx, by),
            v: ImageF32::with_border(w, h, bx, by),
        }
    }

    /// Constant field, handy for synthetic setups.
    pub fn constant(w: usize, h: usize, bx: usize, by: usize, u: f32, v: f32) -> Self {
        Self {
            u: ImageF32::from_fn(w, h, bx, by, |_, _| u),
            v: ImageF32::from_fn(w, h, bx, by, |_, _| v),
        }
    }

    pub fn width(&self) -> usize {
        self.u.w
    }

    pub fn height(&self) -> usize {
        self.u.h
    }

    /// Whole-field additive update `self += increment`.
    pub fn add_assign(&mut self, increment: &FlowField) {
        self.u.add_assign(&increment.u);
        self.v.add_assign(&increment.v);
    }

    pub fn mirror_bounds(&mut self) {
        mirror_bounds(&mut self.u);
        mirror_bounds(&mut self.v);
    }

    pub fn set_bounds(&mut self, value: f32) {
        set_bounds(&mut self.u, value);
        set_bounds(&mut self.v, value);
    }

    /// Resample both components to `w × h`. Values are physical
    /// displacements and are not rescaled.
    pub fn resampled(&self, w: usize, h: usize) -> Self {
        Self {
            u: resample(&self.u, w, h),
            v: resample(&self.v, w, h),
        }
    }

    /// Mean `(u, v)` over the interior.
    pub fn mean(&self) -> (f32, f32) {
        (self.u.mean(), self.v.mean())
    }

    /// Mean `(u, v)` over the interior shrunk by `inset` pixels on each side.
    pub fn mean_inset(&self, inset: usize) -> (f32, f32) {
        let (w, h) = (self.width(), self.height());
        if 2 * inset >= w || 2 * inset >= h {
            return self.mean();
        }
        let mut su = 0.0f64;
        let mut sv = 0.0f64;
        for y in inset..h - inset {
            for x in inset..w - inset {
                su += self.u.get(x, y) as f64;
                sv += self.v.get(x, y) as f64;
            }
        }
        let n = ((w - 2 * inset) * (h - 2 * inset)) as f64;
        ((su / n) as f32, (sv / n) as f32)
    }

    /// Largest vector length over the interior.
    pub fn max_magnitude(&self) -> f32 {
        let mut best = 0.0f32;
        for y in 0..self.height() {
            for x in 0..self.width() {
                let (u, v) = (self.u.get(x, y), self.v.get(x, y));
                best = best.max((u * u + v * v).sqrt());
            }
        }
        best
    }
}

/// Estimated flow together with the per-level diagnostics of the run.
#[derive(Clone, Debug)]
pub struct FlowResult {
    pub flow: FlowField,
    pub report: FlowReport,
}
