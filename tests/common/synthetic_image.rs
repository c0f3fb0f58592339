use horn_schunck_warp::image::ImageF32;
use std::f32::consts::PI;

/// Sum of oriented sinusoids with periods between 17 and 29 pixels.
pub fn textured(x: f32, y: f32) -> f32 {
    128.0
        + 50.0 * (2.0 * PI * x / 23.0 + 0.3).sin()
        + 40.0 * (2.0 * PI * y / 19.0).sin()
        + 30.0 * (2.0 * PI * (x + 0.7 * y) / 29.0).sin()
        + 20.0 * (2.0 * PI * (0.5 * x - y) / 17.0).cos()
}

/// Low-frequency blob texture that stays meaningful on very coarse levels.
pub fn smooth(x: f32, y: f32) -> f32 {
    128.0 + 60.0 * (x * 0.21).sin() * (y * 0.17).cos() + 30.0 * ((x + y) * 0.09).sin()
}

/// Frame pair `(f1, f2)` with `f2(x, y) = f1(x − du, y − dv)`, i.e. the
/// true flow from `f1` to `f2` is the constant `(du, dv)`.
pub fn translated_pair(
    width: usize,
    height: usize,
    du: f32,
    dv: f32,
    pattern: fn(f32, f32) -> f32,
) -> (ImageF32, ImageF32) {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let f1 = ImageF32::from_fn(width, height, 0, 0, |x, y| pattern(x as f32, y as f32));
    let f2 = ImageF32::from_fn(width, height, 0, 0, |x, y| {
        pattern(x as f32 - du, y as f32 - dv)
    });
    (f1, f2)
}
