use horn_schunck_warp::image::ImageF32;
use horn_schunck_warp::{FlowEstimator, FlowParams};

fn main() {
    env_logger::init();

    // Demo stub: a smooth synthetic texture shifted by (1.5, -0.5) pixels.
    let (w, h) = (96usize, 72usize);
    let (du, dv) = (1.5f32, -0.5f32);
    let texture = |x: f32, y: f32| {
        128.0 + 60.0 * (x * 0.21).sin() * (y * 0.17).cos() + 30.0 * ((x + y) * 0.09).sin()
    };
    let f1 = ImageF32::from_fn(w, h, 0, 0, |x, y| texture(x as f32, y as f32));
    let f2 = ImageF32::from_fn(w, h, 0, 0, |x, y| texture(x as f32 - du, y as f32 - dv));

    let params = FlowParams::default().with_alpha(5.0);
    let result = FlowEstimator::new(params).and_then(|est| est.estimate(&f1, &f2));
    match result {
        Ok(res) => {
            let (u, v) = res.flow.mean_inset(8);
            println!(
                "levels={} mean_flow=({u:.3}, {v:.3}) expected=({du}, {dv}) latency_ms={:.3}",
                res.report.levels.len(),
                res.report.timings.total_ms
            );
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
