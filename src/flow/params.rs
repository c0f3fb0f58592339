use crate::error::FlowError;
use crate::pyramid::PyramidParams;
use crate::solver::SolverParams;

use serde::{Deserialize, Serialize};

/// Complete configuration of a flow estimation run.
///
/// Every field has a default, so JSON configs only need to name what they
/// change. Solver options are flattened into the top level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    #[serde(flatten)]
    pub solver: SolverParams,
    #[serde(flatten)]
    pub pyramid: PyramidParams,
    /// Margin cells `(bx, by)` around every working buffer
    pub border: (usize, usize),
    /// Grid spacing of the input frames
    pub hx: f32,
    pub hy: f32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            solver: SolverParams::default(),
            pyramid: PyramidParams::default(),
            border: (2, 2),
            hx: 1.0,
            hy: 1.0,
        }
    }
}

impl FlowParams {
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.solver.alpha = alpha;
        self
    }

    pub fn with_iterations(mut self, outer: usize, inner: usize) -> Self {
        self.solver.outer_iterations = outer;
        self.solver.inner_iterations = inner;
        self
    }

    pub fn with_levels(mut self, levels: usize) -> Self {
        self.pyramid.levels = levels;
        self
    }

    /// Check every option against its admissible range.
    pub fn validate(&self) -> Result<(), FlowError> {
        self.solver.validate()?;
        self.pyramid.validate()?;
        if !(self.hx > 0.0 && self.hy > 0.0) {
            return Err(FlowError::invalid(
                "hx/hy",
                format!("grid spacing must be > 0, got ({}, {})", self.hx, self.hy),
            ));
        }
        if self.border.0 == 0 || self.border.1 == 0 {
            return Err(FlowError::invalid(
                "border",
                format!("margins must be >= 1, got {:?}", self.border),
            ));
        }
        Ok(())
    }
}
