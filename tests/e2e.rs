mod common;

use common::synthetic_image::{smooth, textured, translated_pair};
use horn_schunck_warp::{FlowEstimator, FlowParams, SweepOrder};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Three levels, robust contrast 0.1: the configuration the textured
/// pattern is tuned for.
fn textured_params(alpha: f32) -> FlowParams {
    let mut params = FlowParams::default().with_alpha(alpha).with_levels(3);
    params.solver.epsilon_d = 0.1;
    params.solver.epsilon_s = 0.1;
    params
}

#[test]
fn recovers_horizontal_translation() {
    init_logging();
    let (f1, f2) = translated_pair(64, 64, 2.0, 0.0, textured);
    let estimator = FlowEstimator::new(textured_params(5.0)).expect("valid params");
    let result = estimator.estimate(&f1, &f2).expect("estimation runs");

    let (u, v) = result.flow.mean_inset(8);
    assert!((u - 2.0).abs() < 0.2, "mean u = {u:.4}");
    assert!(v.abs() < 0.2, "mean v = {v:.4}");

    for y in 8..56 {
        for x in 8..56 {
            let (pu, pv) = (result.flow.u.get(x, y), result.flow.v.get(x, y));
            assert!(
                (pu - 2.0).hypot(pv) < 0.5,
                "({x}, {y}) estimated ({pu:.3}, {pv:.3})"
            );
        }
    }
    assert_eq!(result.report.levels.len(), 3);
}

#[test]
fn recovers_subpixel_diagonal_translation_with_full_pyramid() {
    init_logging();
    let (f1, f2) = translated_pair(96, 72, 1.5, -0.5, smooth);
    let params = FlowParams::default().with_alpha(5.0);
    let estimator = FlowEstimator::new(params).expect("valid params");
    let result = estimator.estimate(&f1, &f2).expect("estimation runs");

    let (u, v) = result.flow.mean_inset(8);
    assert!((u - 1.5).abs() < 0.1, "mean u = {u:.4}");
    assert!((v + 0.5).abs() < 0.1, "mean v = {v:.4}");

    let coarsest = &result.report.levels[0];
    assert!(coarsest.level.nx >= 4 && coarsest.level.ny >= 4);
    assert!(result.report.levels.len() > 3);
}

#[test]
fn identical_frames_give_zero_flow() {
    init_logging();
    let (f1, _) = translated_pair(48, 40, 0.0, 0.0, textured);
    for (alpha, epsilon_d, epsilon_s) in [
        (100.0, 0.01, 0.01),
        (1.0, 0.5, 2.0),
        (500.0, 3.0, 0.001),
    ] {
        let mut params = FlowParams::default();
        params.solver.alpha = alpha;
        params.solver.epsilon_d = epsilon_d;
        params.solver.epsilon_s = epsilon_s;
        let result = FlowEstimator::new(params)
            .and_then(|e| e.estimate(&f1, &f1))
            .expect("estimation runs");
        for y in 0..40 {
            for x in 0..48 {
                assert_eq!(result.flow.u.get(x, y), 0.0, "alpha={alpha} at ({x}, {y})");
                assert_eq!(result.flow.v.get(x, y), 0.0, "alpha={alpha} at ({x}, {y})");
            }
        }
        assert!(result.report.levels.iter().all(|l| l.stats.data_energy == 0.0));
    }
}

#[test]
fn red_black_sweep_reaches_the_same_flow() {
    init_logging();
    let (f1, f2) = translated_pair(64, 64, 2.0, 0.0, textured);
    let mut params = textured_params(20.0);
    params.solver.sweep = SweepOrder::RedBlack;
    let result = FlowEstimator::new(params)
        .and_then(|e| e.estimate(&f1, &f2))
        .expect("estimation runs");
    let (u, v) = result.flow.mean_inset(8);
    assert!((u - 2.0).abs() < 0.2, "mean u = {u:.4}");
    assert!(v.abs() < 0.2, "mean v = {v:.4}");
}

#[test]
fn gradient_constancy_blend_recovers_translation() {
    init_logging();
    let (f1, f2) = translated_pair(64, 64, 2.0, 0.0, textured);
    let mut params = textured_params(20.0);
    params.solver.lambda = 0.5;
    let result = FlowEstimator::new(params)
        .and_then(|e| e.estimate(&f1, &f2))
        .expect("estimation runs");
    let (u, v) = result.flow.mean_inset(8);
    assert!((u - 2.0).abs() < 0.2, "mean u = {u:.4}");
    assert!(v.abs() < 0.2, "mean v = {v:.4}");
}

#[test]
fn report_serializes_to_camel_case_json() {
    init_logging();
    let (f1, f2) = translated_pair(32, 32, 1.0, 0.0, smooth);
    let params = FlowParams::default().with_iterations(2, 5).with_levels(2);
    let result = FlowEstimator::new(params)
        .and_then(|e| e.estimate(&f1, &f2))
        .expect("estimation runs");
    let json = serde_json::to_value(&result.report).expect("report serializes");
    assert_eq!(json["input"]["pyramidLevels"], 2);
    let levels = json["levels"].as_array().expect("levels array");
    assert_eq!(levels.len(), 2);
    assert!(levels[0].get("dataEnergy").is_some());
    assert!(levels[0].get("outerEnergies").is_some());
    assert_eq!(levels[1]["nx"], 32);
    assert!(json["timings"]["totalMs"].as_f64().is_some());
}
