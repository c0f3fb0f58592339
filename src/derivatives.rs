//! Centered finite differences on bordered fields.
//!
//! `fx(x, y) = (f(x+1, y) − f(x−1, y)) / (2·hx)` and likewise for `fy`.
//! The stencil reads one margin cell, so inputs need `bx, by ≥ 1` and must be
//! boundary-extended by the caller. Outputs share the input layout and keep
//! zero margins.
use crate::image::ImageF32;

/// Horizontal and vertical centered derivatives of `f`.
pub fn central_gradient(f: &ImageF32, hx: f32, hy: f32) -> (ImageF32, ImageF32) {
    (central_dx(f, hx), central_dy(f, hy))
}

/// Centered derivative along x.
pub fn central_dx(f: &ImageF32, hx: f32) -> ImageF32 {
    assert!(f.bx >= 1, "central differences need a horizontal margin");
    let scale = 1.0 / (2.0 * hx);
    let mut out = f.zeros_like();
    for y in 0..f.h {
        let row = f.index(0, y);
        for x in 0..f.w {
            let i = row + x;
            out.data[i] = (f.data[i + 1] - f.data[i - 1]) * scale;
        }
    }
    out
}

/// Centered derivative along y.
pub fn central_dy(f: &ImageF32, hy: f32) -> ImageF32 {
    assert!(f.by >= 1, "central differences need a vertical margin");
    let scale = 1.0 / (2.0 * hy);
    let stride = f.stride;
    let mut out = f.zeros_like();
    for y in 0..f.h {
        let row = f.index(0, y);
        for x in 0..f.w {
            let i = row + x;
            out.data[i] = (f.data[i + stride] - f.data[i - stride]) * scale;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::mirror_bounds;

    #[test]
    fn linear_ramp_has_constant_interior_slope() {
        let mut f = ImageF32::from_fn(8, 6, 1, 1, |x, y| 3.0 * x as f32 - 2.0 * y as f32);
        mirror_bounds(&mut f);
        let (fx, fy) = central_gradient(&f, 1.0, 0.5);
        for y in 1..5 {
            for x in 1..7 {
                assert!((fx.get(x, y) - 3.0).abs() < 1e-5);
                assert!((fy.get(x, y) + 4.0).abs() < 1e-5);
            }
        }
        // Mirrored border halves the one-sided difference.
        assert!((fx.get(0, 2) - 1.5).abs() < 1e-5);
        assert!((fx.get(7, 2) - 1.5).abs() < 1e-5);
    }
}
