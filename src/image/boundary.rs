//! Boundary extension for bordered fields.
//!
//! - `mirror_bounds`: Neumann extension. Margin cell `-1-k` mirrors interior
//!   cell `k`, and `w+k` mirrors `w-1-k`, on both axes. Corners are filled by
//!   mirroring the already-extended rows.
//! - `set_bounds`: Dirichlet extension with a constant.
//!
//! Every stencil and relaxation pass calls one of these first.
use super::ImageF32;

/// Reflect the interior into the margins.
pub fn mirror_bounds(img: &mut ImageF32) {
    if img.w == 0 || img.h == 0 {
        return;
    }
    let (w, h) = (img.w as isize, img.h as isize);
    let (bx, by) = (img.bx as isize, img.by as isize);

    // Columns first, on interior rows.
    for y in 0..h {
        for k in 0..bx {
            let left = k.min(w - 1);
            let right = (w - 1 - k).max(0);
            let v_left = img.at(left, y);
            let v_right = img.at(right, y);
            img.set_at(-1 - k, y, v_left);
            img.set_at(w + k, y, v_right);
        }
    }

    // Then whole rows, margins included, so corners pick up mirrored values.
    let stride = img.stride;
    for k in 0..by {
        let top_src = k.min(h - 1);
        let bottom_src = (h - 1 - k).max(0);
        copy_row(img, top_src, -1 - k, stride);
        copy_row(img, bottom_src, h + k, stride);
    }
}

/// Set every margin cell to `value`; the interior is left untouched.
pub fn set_bounds(img: &mut ImageF32, value: f32) {
    let (w, h) = (img.w as isize, img.h as isize);
    let (bx, by) = (img.bx as isize, img.by as isize);
    for y in -by..h + by {
        let inside_row = (0..h).contains(&y);
        for x in -bx..w + bx {
            if !inside_row || !(0..w).contains(&x) {
                img.set_at(x, y, value);
            }
        }
    }
}

fn copy_row(img: &mut ImageF32, src_y: isize, dst_y: isize, stride: usize) {
    let bx = img.bx as isize;
    let src = img.index_signed(-bx, src_y);
    let dst = img.index_signed(-bx, dst_y);
    img.data.copy_within(src..src + stride, dst);
}
