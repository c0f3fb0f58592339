//! Per-level variational solve: motion tensor, robust re-linearization and
//! SOR relaxation of the flow increment.
//!
//! A level solve builds the motion tensor once, then runs `outer_iterations`
//! rounds of "update both weight fields, run `inner_iterations` SOR sweeps".
//! The increment starts from zero and is returned to the caller, which adds
//! it to the accumulated flow.

pub mod nonlinearity;
pub mod options;
pub mod sor;

pub use nonlinearity::{update_data_weights, update_smoothness_weights, Nonlinearities};
pub use options::{SolverParams, SweepOrder};
pub use sor::sor_sweep;

use crate::image::ImageF32;
use crate::tensor::{interior_indices, MotionTensor};
use crate::types::FlowField;

use log::trace;
use serde::Serialize;

/// Convergence figures of one level solve.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    /// Data energy `Σ (du, dv, 1) J (du, dv, 1)ᵀ` of the final increment
    pub data_energy: f64,
    /// Data energy after each outer iteration
    pub outer_energies: Vec<f64>,
    pub mean_psi_data: f32,
    pub mean_psi_smooth: f32,
}

#[derive(Clone, Debug)]
pub struct LevelSolution {
    pub increment: FlowField,
    pub stats: LevelStats,
}

/// Solve one pyramid level for the increment on top of `flow`.
///
/// `f1` and the registered second frame get their margins mirrored in place.
pub fn solve_level(
    f1: &mut ImageF32,
    f2_warped: &mut ImageF32,
    flow: &mut FlowField,
    hx: f32,
    hy: f32,
    params: &SolverParams,
) -> LevelSolution {
    let tensor = MotionTensor::compute(f1, f2_warped, hx, hy, params.lambda);
    relax_level(&tensor, flow, hx, hy, params)
}

/// Outer/inner iteration loop for an already built motion tensor.
pub fn relax_level(
    tensor: &MotionTensor,
    flow: &mut FlowField,
    hx: f32,
    hy: f32,
    params: &SolverParams,
) -> LevelSolution {
    let mut increment = FlowField {
        u: flow.u.zeros_like(),
        v: flow.v.zeros_like(),
    };
    let mut weights = Nonlinearities::ones_like(&flow.u);
    let mut outer_energies = Vec::with_capacity(params.outer_iterations);

    for outer in 0..params.outer_iterations {
        update_data_weights(
            tensor,
            &increment,
            params.data_diffusivity,
            params.epsilon_d,
            &mut weights.data,
        );
        update_smoothness_weights(
            flow,
            &mut increment,
            hx,
            hy,
            params.smooth_diffusivity,
            params.epsilon_s,
            &mut weights.smooth,
        );
        for _ in 0..params.inner_iterations {
            sor_sweep(
                tensor,
                &mut weights,
                flow,
                &mut increment,
                hx,
                hy,
                params.alpha,
                params.omega,
                params.sweep,
            );
        }
        let energy = data_energy(tensor, &increment);
        trace!("outer {outer}: data energy {energy:.6e}");
        outer_energies.push(energy);
    }

    let stats = LevelStats {
        data_energy: outer_energies
            .last()
            .copied()
            .unwrap_or_else(|| data_energy(tensor, &increment)),
        outer_energies,
        mean_psi_data: weights.data.mean(),
        mean_psi_smooth: weights.smooth.mean(),
    };
    LevelSolution { increment, stats }
}

/// Quadratic data residual of `increment` summed over the interior.
pub fn data_energy(tensor: &MotionTensor, increment: &FlowField) -> f64 {
    interior_indices(&increment.u)
        .map(|i| tensor.residual_at(i, increment.u.data[i], increment.v.data[i]) as f64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_outer_iterations_leaves_zero_increment() {
        let like = ImageF32::with_border(5, 5, 1, 1);
        let t = MotionTensor::constant(&like, [1.0, 1.0, 2.0, 0.0, -0.5, 0.0]);
        let mut flow = FlowField::zeros(5, 5, 1, 1);
        let params = SolverParams {
            outer_iterations: 0,
            ..Default::default()
        };
        let sol = relax_level(&t, &mut flow, 1.0, 1.0, &params);
        assert!(sol.stats.outer_energies.is_empty());
        assert!((sol.stats.data_energy - 50.0).abs() < 1e-6);
        assert_eq!(sol.increment.u.get(2, 2), 0.0);
    }

    #[test]
    fn identical_frames_give_zero_increment() {
        let mut f1 = ImageF32::from_fn(12, 10, 2, 2, |x, y| {
            ((x * 7 + y * 13) % 17) as f32 * 10.0
        });
        let mut f2 = f1.clone();
        let mut flow = FlowField::zeros(12, 10, 2, 2);
        let sol = solve_level(&mut f1, &mut f2, &mut flow, 1.0, 1.0, &SolverParams::default());
        assert!(sol.increment.u.data.iter().all(|&x| x == 0.0));
        assert!(sol.increment.v.data.iter().all(|&x| x == 0.0));
        assert_eq!(sol.stats.data_energy, 0.0);
    }
}
