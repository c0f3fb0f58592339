use horn_schunck_warp::config::flow_demo::{load_config, FlowDemoConfig};
use horn_schunck_warp::diagnostics::FlowReport;
use horn_schunck_warp::evaluation::{flow_errors, FlowErrors};
use horn_schunck_warp::image::io::{
    load_grayscale_image, read_barron_flow, save_flow_color, write_barron_flow, write_json_file,
};
use horn_schunck_warp::FlowEstimator;
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let f1 = load_grayscale_image(&config.input1).map_err(|e| e.to_string())?;
    let f2 = load_grayscale_image(&config.input2).map_err(|e| e.to_string())?;

    let estimator = FlowEstimator::new(config.params).map_err(|e| e.to_string())?;
    let result = estimator.estimate(&f1, &f2).map_err(|e| e.to_string())?;

    let errors = evaluate(&config, &result.flow)?;
    let output = &config.output;
    let max_disp = output
        .max_displacement
        .unwrap_or_else(|| result.flow.max_magnitude())
        .max(f32::EPSILON);

    save_flow_color(&result.flow, max_disp, &output.flow_png()).map_err(|e| e.to_string())?;
    if output.write_barron {
        write_barron_flow(&result.flow, &output.barron_file()).map_err(|e| e.to_string())?;
    }

    let summary = DemoSummary {
        report: &result.report,
        errors,
        max_displacement: max_disp,
    };
    write_json_file(&output.report_json(), &summary).map_err(|e| e.to_string())?;

    print_text_summary(&result.report, errors.as_ref());
    println!("Flow colour coding written to {}", output.flow_png().display());
    println!("JSON report written to {}", output.report_json().display());
    Ok(())
}

fn evaluate(
    config: &FlowDemoConfig,
    flow: &horn_schunck_warp::FlowField,
) -> Result<Option<FlowErrors>, String> {
    let Some(path) = &config.ground_truth else {
        return Ok(None);
    };
    let (bx, by) = config.params.border;
    let truth = read_barron_flow(path, flow.width(), flow.height(), bx, by)
        .map_err(|e| e.to_string())?;
    flow_errors(&truth, flow).map(Some).map_err(|e| e.to_string())
}

fn print_text_summary(report: &FlowReport, errors: Option<&FlowErrors>) {
    println!("Flow summary");
    println!(
        "  input: {}x{}, {} pyramid levels",
        report.input.width, report.input.height, report.input.pyramid_levels
    );
    for level in &report.levels {
        println!("  {}", level.summary());
    }
    println!("  total_ms: {:.3}", report.timings.total_ms);
    if let Some(e) = errors {
        println!(
            "  AAE: {:.4} deg, AEE: {:.4} px ({} pixels)",
            e.aae, e.aee, e.valid_pixels
        );
        println!(
            "  mean length: reference {:.4}, computed {:.4}",
            e.reference_length, e.computed_length
        );
    }
}

fn usage() -> String {
    "Usage: flow_demo <config.json>".to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoSummary<'a> {
    report: &'a FlowReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FlowErrors>,
    max_displacement: f32,
}
