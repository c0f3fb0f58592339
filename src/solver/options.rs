use crate::diffusivity::Diffusivity;
use crate::error::FlowError;

use serde::{Deserialize, Serialize};

/// Pixel visiting order of one relaxation sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepOrder {
    /// Row-major Gauss–Seidel: every update sees the ones before it.
    #[default]
    Lexicographic,
    /// Checkerboard ordering. Pixels of one colour only couple to the other
    /// colour, so each half-sweep may run in parallel.
    RedBlack,
}

/// Parameters of the per-level variational solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// Smoothness weight α.
    pub alpha: f32,
    /// Contrast of the data-term penalizer.
    pub epsilon_d: f32,
    /// Contrast of the smoothness-term penalizer.
    pub epsilon_s: f32,
    /// Blend between brightness (0) and gradient (1) constancy.
    pub lambda: f32,
    /// SOR sweeps per outer iteration.
    pub inner_iterations: usize,
    /// Weight re-linearizations per level.
    pub outer_iterations: usize,
    /// Over-relaxation factor in `(0, 2)`.
    pub omega: f32,
    pub data_diffusivity: Diffusivity,
    pub smooth_diffusivity: Diffusivity,
    pub sweep: SweepOrder,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            alpha: 100.0,
            epsilon_d: 0.01,
            epsilon_s: 0.01,
            lambda: 0.0,
            inner_iterations: 30,
            outer_iterations: 5,
            omega: 1.9,
            data_diffusivity: Diffusivity::Charbonnier,
            smooth_diffusivity: Diffusivity::Charbonnier,
            sweep: SweepOrder::Lexicographic,
        }
    }
}

impl SolverParams {
    pub fn validate(&self) -> Result<(), FlowError> {
        if !(self.alpha > 0.0 && self.alpha.is_finite()) {
            return Err(FlowError::invalid("alpha", format!("must be > 0, got {}", self.alpha)));
        }
        if !(self.epsilon_d > 0.0) {
            return Err(FlowError::invalid(
                "epsilon_d",
                format!("must be > 0, got {}", self.epsilon_d),
            ));
        }
        if !(self.epsilon_s > 0.0) {
            return Err(FlowError::invalid(
                "epsilon_s",
                format!("must be > 0, got {}", self.epsilon_s),
            ));
        }
        if !(0.0..=1.0).contains(&self.lambda) {
            return Err(FlowError::invalid(
                "lambda",
                format!("must lie in [0, 1], got {}", self.lambda),
            ));
        }
        if !(self.omega > 0.0 && self.omega < 2.0) {
            return Err(FlowError::invalid(
                "omega",
                format!("must lie in (0, 2), got {}", self.omega),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SolverParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            SolverParams { omega: 2.0, ..Default::default() },
            SolverParams { omega: 0.0, ..Default::default() },
            SolverParams { lambda: 1.5, ..Default::default() },
            SolverParams { epsilon_d: 0.0, ..Default::default() },
            SolverParams { epsilon_s: -1.0, ..Default::default() },
            SolverParams { alpha: 0.0, ..Default::default() },
        ];
        for p in bad {
            assert!(matches!(p.validate(), Err(FlowError::InvalidParameter { .. })), "{p:?}");
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let p: SolverParams =
            serde_json::from_str(r#"{ "alpha": 20.0, "sweep": "red_black" }"#).unwrap();
        assert_eq!(p.alpha, 20.0);
        assert_eq!(p.sweep, SweepOrder::RedBlack);
        assert_eq!(p.inner_iterations, 30);
    }
}
