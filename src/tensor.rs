//! Motion tensor for the linearized brightness/gradient constancy data term.
//!
//! Per pixel the six fields form the symmetric 3×3 quadratic form
//!
//! ```text
//!        | J11 J12 J13 |
//!    J = | J12 J22 J23 |,   E_data(du, dv) = (du, dv, 1) J (du, dv, 1)ᵀ
//!        | J13 J23 J33 |
//! ```
//!
//! Each entry blends a normalized gradient constancy term (weight `λ`) with a
//! normalized brightness constancy term (weight `1 − λ`). Every contribution
//! is an outer product scaled by a positive factor, so `J` is positive
//! semi-definite by construction.
//!
//! Normalization factors down-weight high-gradient and high-curvature areas:
//! `θ = 1/(fx² + fy² + 0.1)`, `θx = 1/(fxx² + fxy² + 0.1)`,
//! `θy = 1/(fxy² + fyy² + 0.1)`.
use crate::derivatives::{central_dx, central_gradient};
use crate::image::{mirror_bounds, ImageF32};
use nalgebra::{Matrix3, Vector3};

/// Regularizer added to every normalization denominator.
const NORMALIZATION_EPS: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct MotionTensor {
    pub j11: ImageF32,
    pub j22: ImageF32,
    pub j33: ImageF32,
    pub j12: ImageF32,
    pub j13: ImageF32,
    pub j23: ImageF32,
}

impl MotionTensor {
    /// All-zero tensor shaped like `like`.
    pub fn zeros_like(like: &ImageF32) -> Self {
        Self {
            j11: like.zeros_like(),
            j22: like.zeros_like(),
            j33: like.zeros_like(),
            j12: like.zeros_like(),
            j13: like.zeros_like(),
            j23: like.zeros_like(),
        }
    }

    /// Spatially constant tensor shaped like `like`, given as
    /// `[j11, j22, j33, j12, j13, j23]`.
    pub fn constant(like: &ImageF32, entries: [f32; 6]) -> Self {
        let mut t = Self::zeros_like(like);
        for (field, value) in t.fields_mut().into_iter().zip(entries) {
            field.fill(value);
        }
        t
    }

    /// Build the tensor from the frame pair `(f1, f2)`.
    ///
    /// Both frames get their margins mirrored in place before differencing.
    /// `lambda ∈ [0, 1]` selects pure brightness constancy (`0`) through pure
    /// gradient constancy (`1`).
    pub fn compute(f1: &mut ImageF32, f2: &mut ImageF32, hx: f32, hy: f32, lambda: f32) -> Self {
        assert!(f1.same_layout(f2), "motion tensor needs frames of equal layout");
        mirror_bounds(f1);
        mirror_bounds(f2);

        let (f1x, f1y) = central_gradient(f1, hx, hy);
        let (f2x, f2y) = central_gradient(f2, hx, hy);
        let mut fx = f1.zeros_like();
        let mut fy = f1.zeros_like();
        let mut ft = f1.zeros_like();
        for i in interior_indices(f1) {
            fx.data[i] = 0.5 * (f1x.data[i] + f2x.data[i]);
            fy.data[i] = 0.5 * (f1y.data[i] + f2y.data[i]);
            ft.data[i] = f2.data[i] - f1.data[i];
        }

        mirror_bounds(&mut fx);
        mirror_bounds(&mut fy);
        mirror_bounds(&mut ft);

        let fxx = central_dx(&fx, hx);
        let (fxy, fyy) = central_gradient(&fy, hx, hy);
        let (fxt, fyt) = central_gradient(&ft, hx, hy);

        let mut t = Self::zeros_like(f1);
        let brightness = 1.0 - lambda;
        for i in interior_indices(f1) {
            let (gx, gy, gt) = (fx.data[i], fy.data[i], ft.data[i]);
            let (gxx, gxy, gyy) = (fxx.data[i], fxy.data[i], fyy.data[i]);
            let (gxt, gyt) = (fxt.data[i], fyt.data[i]);

            let theta_x = 1.0 / (gxx * gxx + gxy * gxy + NORMALIZATION_EPS);
            let theta_y = 1.0 / (gxy * gxy + gyy * gyy + NORMALIZATION_EPS);
            let theta = brightness / (gx * gx + gy * gy + NORMALIZATION_EPS);
            let (tx, ty) = (lambda * theta_x, lambda * theta_y);

            t.j11.data[i] = tx * gxx * gxx + ty * gxy * gxy + theta * gx * gx;
            t.j22.data[i] = tx * gxy * gxy + ty * gyy * gyy + theta * gy * gy;
            t.j33.data[i] = tx * gxt * gxt + ty * gyt * gyt + theta * gt * gt;
            t.j12.data[i] = tx * gxx * gxy + ty * gxy * gyy + theta * gx * gy;
            t.j13.data[i] = tx * gxx * gxt + ty * gxy * gyt + theta * gx * gt;
            t.j23.data[i] = tx * gxy * gxt + ty * gyy * gyt + theta * gy * gt;
        }
        t
    }

    /// The 3×3 form at interior pixel `(x, y)`.
    pub fn matrix(&self, x: usize, y: usize) -> Matrix3<f32> {
        let i = self.j11.index(x, y);
        let (j11, j22, j33) = (self.j11.data[i], self.j22.data[i], self.j33.data[i]);
        let (j12, j13, j23) = (self.j12.data[i], self.j13.data[i], self.j23.data[i]);
        Matrix3::new(j11, j12, j13, j12, j22, j23, j13, j23, j33)
    }

    /// Quadratic data residual `(du, dv, 1) J (du, dv, 1)ᵀ` at linear index `i`.
    #[inline]
    pub fn residual_at(&self, i: usize, du: f32, dv: f32) -> f32 {
        self.j11.data[i] * du * du
            + self.j22.data[i] * dv * dv
            + 2.0 * self.j12.data[i] * du * dv
            + 2.0 * self.j13.data[i] * du
            + 2.0 * self.j23.data[i] * dv
            + self.j33.data[i]
    }

    /// Same residual evaluated through the matrix form, for inspection.
    pub fn energy(&self, x: usize, y: usize, du: f32, dv: f32) -> f32 {
        let w = Vector3::new(du, dv, 1.0);
        w.dot(&(self.matrix(x, y) * w))
    }

    fn fields_mut(&mut self) -> [&mut ImageF32; 6] {
        [
            &mut self.j11,
            &mut self.j22,
            &mut self.j33,
            &mut self.j12,
            &mut self.j13,
            &mut self.j23,
        ]
    }
}

/// Linear indices of every interior pixel of `img`, row by row.
///
/// Only the geometry is captured, so the image may be written while the
/// indices are walked.
pub(crate) fn interior_indices(img: &ImageF32) -> impl Iterator<Item = usize> {
    let (w, h, stride, bx, by) = (img.w, img.h, img.stride, img.bx, img.by);
    (0..h).flat_map(move |y| {
        let row = (y + by) * stride + bx;
        row..row + w
    })
}
