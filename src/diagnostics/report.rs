use crate::diagnostics::TimingBreakdown;
use crate::flow::FlowParams;
use crate::pyramid::LevelDescriptor;
use crate::solver::LevelStats;
use serde::Serialize;

/// Summary of one estimation run returned next to the flow field.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    pub input: InputDescriptor,
    pub params: FlowParams,
    /// Visited levels, coarsest first
    pub levels: Vec<LevelReport>,
    pub timings: TimingBreakdown,
}

impl FlowReport {
    /// Report of the finest level, if any level ran.
    pub fn finest(&self) -> Option<&LevelReport> {
        self.levels.last()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub pyramid_levels: usize,
}

/// What happened on a single pyramid level.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelReport {
    #[serde(flatten)]
    pub level: LevelDescriptor,
    pub mean_intensity: f32,
    pub elapsed_ms: f64,
    #[serde(flatten)]
    pub stats: LevelStats,
    /// Mean accumulated flow after this level
    pub mean_flow: [f32; 2],
    pub max_magnitude: f32,
}

impl LevelReport {
    pub fn summary(&self) -> String {
        format!(
            "level {} ({}x{}, h=({:.3},{:.3})): energy {:.4e}, mean flow ({:.3}, {:.3}), {:.2} ms",
            self.level.depth,
            self.level.nx,
            self.level.ny,
            self.level.hx,
            self.level.hy,
            self.stats.data_energy,
            self.mean_flow[0],
            self.mean_flow[1],
            self.elapsed_ms
        )
    }
}
