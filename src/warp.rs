//! Backward registration of the second frame towards the first.
//!
//! Pixel `(x, y)` of the output samples `f2` at `(x + u/hx, y + v/hy)`.
//! Samples that would leave `[0, w−1] × [0, h−1]` fall back to `f1(x, y)`,
//! which makes the temporal difference vanish there.
use crate::image::{set_bounds, ImageF32};
use crate::types::FlowField;

/// Warp `f2` by `flow` onto the grid of `f1`.
///
/// The margins of `f2` are zeroed in place first. The result shares the
/// layout of `f1`.
pub fn backward_registration(
    f1: &ImageF32,
    f2: &mut ImageF32,
    flow: &FlowField,
    hx: f32,
    hy: f32,
) -> ImageF32 {
    set_bounds(f2, 0.0);
    let (w, h) = (f1.w, f1.h);
    let (max_x, max_y) = ((w - 1) as f32, (h - 1) as f32);
    let mut out = f1.zeros_like();
    for y in 0..h {
        for x in 0..w {
            let sx = x as f32 + flow.u.get(x, y) / hx;
            let sy = y as f32 + flow.v.get(x, y) / hy;
            let value = if (0.0..=max_x).contains(&sx) && (0.0..=max_y).contains(&sy) {
                bilinear(f2, sx, sy)
            } else {
                f1.get(x, y)
            };
            out.set(x, y, value);
        }
    }
    out
}

/// Bilinear sample of `img` at a point inside `[0, w−1] × [0, h−1]`.
///
/// On the last row/column the far neighbour lies in the margin and enters
/// with zero weight.
#[inline]
pub fn bilinear(img: &ImageF32, sx: f32, sy: f32) -> f32 {
    let x0 = sx.floor();
    let y0 = sy.floor();
    let (ax, ay) = (sx - x0, sy - y0);
    let (ix, iy) = (x0 as isize, y0 as isize);
    let i = img.index_signed(ix, iy);
    let s = img.stride;
    let right = if ax > 0.0 { img.data[i + 1] } else { 0.0 };
    let below = if ay > 0.0 { img.data[i + s] } else { 0.0 };
    let diag = if ax > 0.0 && ay > 0.0 { img.data[i + s + 1] } else { 0.0 };
    (1.0 - ax) * (1.0 - ay) * img.data[i]
        + ax * (1.0 - ay) * right
        + (1.0 - ax) * ay * below
        + ax * ay * diag
}
