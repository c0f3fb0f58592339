use crate::error::FlowError;
use crate::flow::FlowParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct FlowDemoConfig {
    /// First frame
    pub input1: PathBuf,
    /// Second frame
    pub input2: PathBuf,
    /// Optional Barron `.F` ground truth for error reporting
    #[serde(default)]
    pub ground_truth: Option<PathBuf>,
    #[serde(default)]
    pub params: FlowParams,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Displacement rendered at full brightness; the largest estimated
    /// vector length when unset.
    pub max_displacement: Option<f32>,
    /// Also write the estimate as a Barron `.F` file
    pub write_barron: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("out"),
            max_displacement: None,
            write_barron: false,
        }
    }
}

impl OutputConfig {
    pub fn flow_png(&self) -> PathBuf {
        self.dir.join("flow.png")
    }

    pub fn report_json(&self) -> PathBuf {
        self.dir.join("report.json")
    }

    pub fn barron_file(&self) -> PathBuf {
        self.dir.join("flow.F")
    }
}

pub fn load_config(path: &Path) -> Result<FlowDemoConfig, FlowError> {
    let contents = fs::read_to_string(path).map_err(|e| FlowError::io(path, e))?;
    let config: FlowDemoConfig = serde_json::from_str(&contents)
        .map_err(|e| FlowError::Config(format!("failed to parse {}: {e}", path.display())))?;
    config.params.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: FlowDemoConfig =
            serde_json::from_str(r#"{ "input1": "a.png", "input2": "b.png" }"#).unwrap();
        assert_eq!(cfg.params, FlowParams::default());
        assert_eq!(cfg.output.dir, PathBuf::from("out"));
        assert!(cfg.ground_truth.is_none());
        assert_eq!(cfg.output.report_json(), PathBuf::from("out/report.json"));
    }

    #[test]
    fn load_rejects_invalid_params() {
        let dir = std::env::temp_dir().join(format!("hsw-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        fs::write(
            &path,
            r#"{ "input1": "a.png", "input2": "b.png", "params": { "omega": 3.0 } }"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(&path),
            Err(FlowError::InvalidParameter { name: "omega", .. })
        ));
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(&path), Err(FlowError::Config(_))));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn shipped_demo_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/flow.json");
        let cfg = load_config(&path).expect("config/flow.json parses");
        assert_eq!(cfg.params.solver.alpha, 100.0);
        assert_eq!(cfg.params.border, (2, 2));
        assert_eq!(cfg.output.max_displacement, Some(4.0));
        assert!(cfg.output.write_barron);
        assert_eq!(cfg.ground_truth, Some(PathBuf::from("data/flow10.F")));
    }
}
