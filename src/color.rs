//! Colour coding of flow vectors.
//!
//! Direction selects the hue along a circle through red, magenta, blue,
//! cyan, green and yellow; magnitude (cut at 1) scales the brightness, so
//! zero flow is black.
use crate::types::FlowField;
use std::f32::consts::PI;

/// Anchor colours at `phase / π`, where phase is half the vector angle.
const ANCHORS: [(f32, [f32; 3]); 7] = [
    (0.0, [255.0, 0.0, 0.0]),
    (0.125, [255.0, 0.0, 255.0]),
    (0.25, [64.0, 64.0, 255.0]),
    (0.375, [0.0, 255.0, 255.0]),
    (0.5, [0.0, 255.0, 0.0]),
    (0.75, [255.0, 255.0, 0.0]),
    (1.0, [255.0, 0.0, 0.0]),
];

/// RGB colour of the vector `(x, y)`.
pub fn vector_to_rgb(x: f32, y: f32) -> [u8; 3] {
    let amp = x.hypot(y).min(1.0);
    let mut phi = y.atan2(x);
    if phi < 0.0 {
        phi += 2.0 * PI;
    }
    let t = (phi / 2.0 / PI).clamp(0.0, 1.0);

    let seg = ANCHORS
        .windows(2)
        .find(|pair| t < pair[1].0)
        .unwrap_or(&ANCHORS[5..7]);
    let (t0, c0) = seg[0];
    let (t1, c1) = seg[1];
    let beta = (t - t0) / (t1 - t0);
    let alpha = 1.0 - beta;

    let mut rgb = [0u8; 3];
    for (out, (&a, &b)) in rgb.iter_mut().zip(c0.iter().zip(c1.iter())) {
        *out = (amp * (alpha * a + beta * b)).floor().clamp(0.0, 255.0) as u8;
    }
    rgb
}

/// Colour-code every interior pixel of `flow`, row-major.
///
/// Vectors are divided by `max_disp` first, so displacements of that length
/// reach full brightness.
pub fn flow_to_rgb(flow: &FlowField, max_disp: f32) -> Vec<[u8; 3]> {
    let scale = if max_disp > 0.0 { 1.0 / max_disp } else { 1.0 };
    let mut out = Vec::with_capacity(flow.width() * flow.height());
    for y in 0..flow.height() {
        for x in 0..flow.width() {
            out.push(vector_to_rgb(scale * flow.u.get(x, y), scale * flow.v.get(x, y)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_directions() {
        assert_eq!(vector_to_rgb(1.0, 0.0), [255, 0, 0]);
        assert_eq!(vector_to_rgb(0.0, 1.0), [64, 64, 255]);
        assert_eq!(vector_to_rgb(-1.0, 0.0), [0, 255, 0]);
        assert_eq!(vector_to_rgb(0.0, 0.0), [0, 0, 0]);
    }

    #[test]
    fn magnitude_is_cut_at_one() {
        assert_eq!(vector_to_rgb(5.0, 0.0), [255, 0, 0]);
        let half = vector_to_rgb(0.5, 0.0);
        assert_eq!(half, [127, 0, 0]);
    }

    #[test]
    fn flow_image_uses_max_displacement() {
        let flow = FlowField::constant(3, 2, 1, 1, 4.0, 0.0);
        let rgb = flow_to_rgb(&flow, 8.0);
        assert_eq!(rgb.len(), 6);
        assert!(rgb.iter().all(|&c| c == [127, 0, 0]));
    }
}
