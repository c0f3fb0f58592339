//! Separable area resampling between pyramid levels.
//!
//! Each axis is resampled independently through a temporary buffer:
//!
//! - shrinking averages the source cells overlapping each target cell,
//!   weighted by overlap length, so the interior mean is preserved;
//! - enlarging interpolates linearly between cell centres, clamping at the
//!   image border;
//! - equal sizes copy.
//!
//! Margins of the output match the source's and are left at zero.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Resample the interior of `src` to `w × h`.
pub fn resample(src: &ImageF32, w: usize, h: usize) -> ImageF32 {
    let mut dst = ImageF32::with_border(w, h, src.bx, src.by);
    let mut tmp = ImageF32::new(w, src.h);
    resample_into(src, &mut dst, &mut tmp);
    dst
}

/// Resample `src` into `dst` using `tmp` (`dst.w × src.h`) for the
/// horizontal pass.
pub fn resample_into(src: &ImageF32, dst: &mut ImageF32, tmp: &mut ImageF32) {
    assert!(
        tmp.w == dst.w && tmp.h == src.h,
        "temporary buffer must be {}x{}",
        dst.w,
        src.h
    );
    if src.w == 0 || src.h == 0 || dst.w == 0 || dst.h == 0 {
        return;
    }

    for y in 0..src.h {
        resample_line(src.row(y), tmp.row_mut(y));
    }

    let mut column_in = vec![0.0f32; src.h];
    let mut column_out = vec![0.0f32; dst.h];
    for x in 0..dst.w {
        for (y, px) in column_in.iter_mut().enumerate() {
            *px = tmp.get(x, y);
        }
        resample_line(&column_in, &mut column_out);
        for (y, &px) in column_out.iter().enumerate() {
            dst.set(x, y, px);
        }
    }
}

/// One-dimensional resampling of `src` onto `dst.len()` cells.
fn resample_line(src: &[f32], dst: &mut [f32]) {
    let (n, m) = (src.len(), dst.len());
    if n == m {
        dst.copy_from_slice(src);
        return;
    }
    let ratio = n as f64 / m as f64;
    if m < n {
        for (j, out) in dst.iter_mut().enumerate() {
            let a = j as f64 * ratio;
            let b = ((j + 1) as f64 * ratio).min(n as f64);
            let first = a.floor() as usize;
            let last = (b.ceil() as usize).min(n);
            let mut acc = 0.0f64;
            let mut weight = 0.0f64;
            for (k, &s) in src.iter().enumerate().take(last).skip(first) {
                let overlap = b.min((k + 1) as f64) - a.max(k as f64);
                if overlap > 0.0 {
                    acc += overlap * s as f64;
                    weight += overlap;
                }
            }
            *out = if weight > 0.0 {
                (acc / weight) as f32
            } else {
                src[clamp_index(first as isize, n)]
            };
        }
    } else {
        for (j, out) in dst.iter_mut().enumerate() {
            let pos = ((j as f64 + 0.5) * ratio - 0.5).clamp(0.0, (n - 1) as f64);
            let k0 = pos.floor() as isize;
            let frac = (pos - k0 as f64) as f32;
            let s0 = src[clamp_index(k0, n)];
            let s1 = src[clamp_index(k0 + 1, n)];
            *out = (1.0 - frac) * s0 + frac * s1;
        }
    }
}

fn clamp_index(idx: isize, upper: usize) -> usize {
    if upper == 0 {
        return 0;
    }
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}
