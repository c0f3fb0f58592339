#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod evaluation;
pub mod flow;
pub mod image;
pub mod types;

// Numerical building blocks – public for tools and tests, but considered
// internals of the estimator.
pub mod color;
pub mod derivatives;
pub mod diffusivity;
pub mod pyramid;
pub mod solver;
pub mod tensor;
pub mod warp;

// --- High-level re-exports -------------------------------------------------

// Main entry points: estimator + results.
pub use crate::error::FlowError;
pub use crate::flow::{FlowEstimator, FlowParams};
pub use crate::types::{FlowField, FlowResult};

// Diagnostics returned by the estimator.
pub use crate::diagnostics::{FlowReport, LevelReport};

pub use crate::diffusivity::Diffusivity;
pub use crate::solver::{SolverParams, SweepOrder};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use horn_schunck_warp::prelude::*;
///
/// # fn main() -> Result<(), FlowError> {
/// let (w, h) = (64usize, 48usize);
/// let f1 = ImageF32::from_fn(w, h, 0, 0, |x, y| ((x + 2 * y) % 9) as f32 * 25.0);
/// let f2 = ImageF32::from_fn(w, h, 0, 0, |x, y| ((x + 2 * y + 1) % 9) as f32 * 25.0);
///
/// let estimator = FlowEstimator::new(FlowParams::default())?;
/// let result = estimator.estimate(&f1, &f2)?;
/// println!("levels={} mean={:?}", result.report.levels.len(), result.flow.mean());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageF32;
    pub use crate::{FlowError, FlowEstimator, FlowField, FlowParams, FlowResult};
}

// --- Stage-level API (for tools & advanced users) ---------------------------

pub mod stages {
    pub use crate::derivatives::central_gradient;
    pub use crate::image::{mirror_bounds, set_bounds};
    pub use crate::pyramid::{compute_max_warp_levels, resample, LevelDescriptor, WarpSchedule};
    pub use crate::solver::{
        relax_level, solve_level, sor_sweep, update_data_weights, update_smoothness_weights,
        LevelSolution, LevelStats, Nonlinearities,
    };
    pub use crate::tensor::MotionTensor;
    pub use crate::warp::backward_registration;
}
