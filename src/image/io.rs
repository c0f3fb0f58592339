//! I/O helpers for grayscale frames, flow fields and JSON.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/PGM into an `ImageF32` holding
//!   gray values in `[0, 255]` (the scale the solver defaults are tuned for).
//! - `save_grayscale_f32`: write an `ImageF32` to an 8-bit grayscale PNG.
//! - `save_flow_color`: write the color-coded flow field to an RGB PNG.
//! - `read_barron_flow` / `write_barron_flow`: Barron `.F` ground-truth files.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageView};
use crate::color::flow_to_rgb;
use crate::error::FlowError;
use crate::types::FlowField;
use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Number of f32 header words in a Barron `.F` file.
const BARRON_HEADER_WORDS: usize = 6;

/// Load an image from disk and convert to grayscale floats in `[0, 255]`.
pub fn load_grayscale_image(path: &Path) -> Result<ImageF32, FlowError> {
    let img = image::open(path)
        .map_err(|e| FlowError::image(path, e))?
        .into_luma8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    Ok(ImageF32::from_fn(w, h, 0, 0, |x, y| {
        img.get_pixel(x as u32, y as u32)[0] as f32
    }))
}

/// Save a float image to a grayscale PNG, rounding and clamping to `[0, 255]`.
pub fn save_grayscale_f32(image: &ImageF32, path: &Path) -> Result<(), FlowError> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = (px + 0.5).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path).map_err(|e| FlowError::image(path, e))
}

/// Save the color coding of `flow`; vectors of length `max_displacement`
/// reach full saturation.
pub fn save_flow_color(
    flow: &FlowField,
    max_displacement: f32,
    path: &Path,
) -> Result<(), FlowError> {
    ensure_parent_dir(path)?;
    let (w, h) = (flow.width(), flow.height());
    let colors = flow_to_rgb(flow, max_displacement);
    let mut out = RgbImage::new(w as u32, h as u32);
    for (i, rgb) in colors.into_iter().enumerate() {
        out.put_pixel((i % w) as u32, (i / w) as u32, Rgb(rgb));
    }
    out.save(path).map_err(|e| FlowError::image(path, e))
}

/// Read a Barron `.F` flow file into a field of size `w × h` with margins
/// `bx`, `by`.
///
/// Layout: six little-endian f32 header words (`nx_total`, `ny_total`, `nx`,
/// `ny`, `offset_x`, `offset_y`) followed by interleaved `(u, v)` pairs in
/// row-major order over the `nx_total × ny_total` grid. The `nx × ny` window
/// starting at the offsets is returned.
pub fn read_barron_flow(
    path: &Path,
    w: usize,
    h: usize,
    bx: usize,
    by: usize,
) -> Result<FlowField, FlowError> {
    let bytes = fs::read(path).map_err(|e| FlowError::io(path, e))?;
    let words: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    if words.len() < BARRON_HEADER_WORDS {
        return Err(FlowError::GroundTruth(format!(
            "{} is too short for a Barron header",
            path.display()
        )));
    }
    let header: Vec<usize> = words[..BARRON_HEADER_WORDS]
        .iter()
        .map(|&v| v.max(0.0) as usize)
        .collect();
    let (nx_total, ny_total, nx, ny, ox, oy) =
        (header[0], header[1], header[2], header[3], header[4], header[5]);
    if nx != w || ny != h {
        return Err(FlowError::GroundTruth(format!(
            "{} holds a {nx}x{ny} field, expected {w}x{h}",
            path.display()
        )));
    }
    let needed = nx_total
        .checked_mul(ny_total)
        .and_then(|n| n.checked_mul(2))
        .and_then(|n| n.checked_add(BARRON_HEADER_WORDS));
    let fits = |offset: usize, len: usize, total: usize| {
        offset.checked_add(len).is_some_and(|end| end <= total)
    };
    let consistent = needed.is_some_and(|n| words.len() >= n)
        && fits(ox, nx, nx_total)
        && fits(oy, ny, ny_total);
    if !consistent {
        return Err(FlowError::GroundTruth(format!(
            "{} is truncated or has inconsistent offsets",
            path.display()
        )));
    }
    let body = &words[BARRON_HEADER_WORDS..];
    let mut flow = FlowField::zeros(w, h, bx, by);
    for y in 0..h {
        for x in 0..w {
            let k = 2 * ((y + oy) * nx_total + x + ox);
            flow.u.set(x, y, body[k]);
            flow.v.set(x, y, body[k + 1]);
        }
    }
    Ok(flow)
}

/// Write `flow` as a Barron `.F` file without crop offsets.
pub fn write_barron_flow(flow: &FlowField, path: &Path) -> Result<(), FlowError> {
    ensure_parent_dir(path)?;
    let (w, h) = (flow.width(), flow.height());
    let mut bytes = Vec::with_capacity(4 * (BARRON_HEADER_WORDS + 2 * w * h));
    let header = [w as f32, h as f32, w as f32, h as f32, 0.0, 0.0];
    for v in header {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    for y in 0..h {
        for x in 0..w {
            bytes.extend_from_slice(&flow.u.get(x, y).to_le_bytes());
            bytes.extend_from_slice(&flow.v.get(x, y).to_le_bytes());
        }
    }
    fs::write(path, bytes).map_err(|e| FlowError::io(path, e))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), FlowError> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        FlowError::Config(format!(
            "Failed to serialize JSON for {}: {e}",
            path.display()
        ))
    })?;
    fs::write(path, json).map_err(|e| FlowError::io(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<(), FlowError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| FlowError::io(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barron_files_keep_both_components() {
        let dir = std::env::temp_dir().join(format!("hsw-barron-{}", std::process::id()));
        let path = dir.join("truth.F");
        let mut flow = FlowField::zeros(5, 3, 1, 1);
        for y in 0..3 {
            for x in 0..5 {
                flow.u.set(x, y, x as f32 - 1.5);
                flow.v.set(x, y, 0.25 * y as f32);
            }
        }
        write_barron_flow(&flow, &path).expect("write");
        let back = read_barron_flow(&path, 5, 3, 2, 2).expect("read");
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(back.u.get(x, y), flow.u.get(x, y));
                assert_eq!(back.v.get(x, y), flow.v.get(x, y));
            }
        }
        assert!(read_barron_flow(&path, 4, 3, 1, 1).is_err());
        let _ = fs::remove_dir_all(&dir);
    }

    fn write_words(path: &Path, words: &[f32]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let bytes: Vec<u8> = words.iter().flat_map(|v| v.to_le_bytes()).collect();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn malformed_barron_headers_are_rejected() {
        let dir = std::env::temp_dir().join(format!("hsw-barron-bad-{}", std::process::id()));
        let path = dir.join("bad.F");
        let body = [0.5f32; 8];

        let huge: Vec<f32> =
            [1e20, 1e20, 2.0, 2.0, 0.0, 0.0].iter().chain(&body).copied().collect();
        write_words(&path, &huge);
        assert!(matches!(
            read_barron_flow(&path, 2, 2, 1, 1),
            Err(FlowError::GroundTruth(_))
        ));

        let far_offset: Vec<f32> =
            [2.0, 2.0, 2.0, 2.0, 1e20, 0.0].iter().chain(&body).copied().collect();
        write_words(&path, &far_offset);
        assert!(matches!(
            read_barron_flow(&path, 2, 2, 1, 1),
            Err(FlowError::GroundTruth(_))
        ));

        let truncated: Vec<f32> = [2.0, 2.0, 2.0, 2.0, 0.0, 0.0]
            .iter()
            .chain(&body[..5])
            .copied()
            .collect();
        write_words(&path, &truncated);
        assert!(matches!(
            read_barron_flow(&path, 2, 2, 1, 1),
            Err(FlowError::GroundTruth(_))
        ));

        let _ = fs::remove_dir_all(&dir);
    }
}
