use crate::error::FlowError;

use serde::{Deserialize, Serialize};

/// Options controlling the coarse-to-fine warping pyramid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidParams {
    /// Size ratio between consecutive levels, in `(0, 1)`.
    pub eta: f32,
    /// Requested number of levels (>= 1). Clamped to what the image size
    /// supports, so a large value means "as many as possible".
    pub levels: usize,
}

impl Default for PyramidParams {
    fn default() -> Self {
        Self {
            eta: 0.5,
            levels: 200,
        }
    }
}

impl PyramidParams {
    pub fn new(eta: f32, levels: usize) -> Self {
        Self { eta, levels }
    }

    pub fn validate(&self) -> Result<(), FlowError> {
        if !(self.eta > 0.0 && self.eta < 1.0) {
            return Err(FlowError::invalid(
                "eta",
                format!("must lie in (0, 1), got {}", self.eta),
            ));
        }
        if self.levels == 0 {
            return Err(FlowError::invalid("levels", "at least one level is required"));
        }
        Ok(())
    }
}
