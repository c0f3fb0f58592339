//! One successive over-relaxation sweep over the level's linear system.
//!
//! The Euler–Lagrange equations of the linearized functional are, per pixel,
//!
//! ```text
//! ψd (J11 du + J12 dv + J13) − div(α ψs ∇(u + du)) = 0
//! ψd (J12 du + J22 dv + J23) − div(α ψs ∇(v + dv)) = 0
//! ```
//!
//! discretized with neighbour weights `α/h² · (ψs(p) + ψs(q))/2`. Neighbours
//! outside the image get weight zero, which is the natural (Neumann)
//! condition on the flow.
use super::nonlinearity::Nonlinearities;
use super::options::SweepOrder;
use crate::image::{mirror_bounds, ImageF32};
use crate::tensor::MotionTensor;
use crate::types::FlowField;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Smallest admissible diagonal of the per-pixel update.
const MIN_DIAGONAL: f32 = 1e-9;

/// Read-only view of everything one pixel update needs.
struct Stencil<'a> {
    tensor: &'a MotionTensor,
    psi_d: &'a ImageF32,
    psi_s: &'a ImageF32,
    u: &'a ImageF32,
    v: &'a ImageF32,
    ax: f32,
    ay: f32,
    omega: f32,
}

impl Stencil<'_> {
    /// New `(du, dv)` at interior pixel `(x, y)` with linear index `i`.
    ///
    /// `dv` is computed from the already relaxed `du` of the same pixel.
    #[inline]
    fn relax(&self, x: usize, y: usize, i: usize, du: &[f32], dv: &[f32]) -> (f32, f32) {
        let s = self.psi_s.stride;
        let (w, h) = (self.psi_s.w, self.psi_s.h);
        let ws = &self.psi_s.data;
        let (u, v) = (&self.u.data, &self.v.data);

        let xp = if x + 1 < w { self.ax * 0.5 * (ws[i + 1] + ws[i]) } else { 0.0 };
        let xm = if x > 0 { self.ax * 0.5 * (ws[i - 1] + ws[i]) } else { 0.0 };
        let yp = if y + 1 < h { self.ay * 0.5 * (ws[i + s] + ws[i]) } else { 0.0 };
        let ym = if y > 0 { self.ay * 0.5 * (ws[i - s] + ws[i]) } else { 0.0 };
        let sum = xp + xm + yp + ym;

        let pd = self.psi_d.data[i];
        let t = self.tensor;
        let omega = self.omega;

        let nb_u = xm * (du[i - 1] + u[i - 1])
            + ym * (du[i - s] + u[i - s])
            + yp * (du[i + s] + u[i + s])
            + xp * (du[i + 1] + u[i + 1]);
        let du_new = (1.0 - omega) * du[i]
            + omega * (-pd * t.j13.data[i] - pd * t.j12.data[i] * dv[i] + nb_u - sum * u[i])
                / (pd * t.j11.data[i] + sum).max(MIN_DIAGONAL);

        let nb_v = xm * (dv[i - 1] + v[i - 1])
            + ym * (dv[i - s] + v[i - s])
            + yp * (dv[i + s] + v[i + s])
            + xp * (dv[i + 1] + v[i + 1]);
        let dv_new = (1.0 - omega) * dv[i]
            + omega * (-pd * t.j23.data[i] - pd * t.j12.data[i] * du_new + nb_v - sum * v[i])
                / (pd * t.j22.data[i] + sum).max(MIN_DIAGONAL);

        (du_new, dv_new)
    }
}

/// Relax `increment` once in place.
///
/// Zeroes the increment margins and mirrors the margins of `flow` and both
/// weight fields before visiting the interior in the requested order.
#[allow(clippy::too_many_arguments)]
pub fn sor_sweep(
    tensor: &MotionTensor,
    weights: &mut Nonlinearities,
    flow: &mut FlowField,
    increment: &mut FlowField,
    hx: f32,
    hy: f32,
    alpha: f32,
    omega: f32,
    order: SweepOrder,
) {
    increment.set_bounds(0.0);
    flow.mirror_bounds();
    mirror_bounds(&mut weights.smooth);
    mirror_bounds(&mut weights.data);

    let stencil = Stencil {
        tensor,
        psi_d: &weights.data,
        psi_s: &weights.smooth,
        u: &flow.u,
        v: &flow.v,
        ax: alpha / (hx * hx),
        ay: alpha / (hy * hy),
        omega,
    };

    match order {
        SweepOrder::Lexicographic => sweep_lexicographic(&stencil, increment),
        SweepOrder::RedBlack => {
            sweep_colour(&stencil, increment, 0);
            sweep_colour(&stencil, increment, 1);
        }
    }
}

fn sweep_lexicographic(stencil: &Stencil<'_>, increment: &mut FlowField) {
    let (w, h) = (increment.u.w, increment.u.h);
    for y in 0..h {
        let row = increment.u.index(0, y);
        for x in 0..w {
            let i = row + x;
            let (du, dv) = stencil.relax(x, y, i, &increment.u.data, &increment.v.data);
            increment.u.data[i] = du;
            increment.v.data[i] = dv;
        }
    }
}

/// Update every pixel with `(x + y) % 2 == colour`.
///
/// Same-colour pixels never neighbour each other, so all updates of one
/// colour read only the state left by the previous half-sweep.
fn sweep_colour(stencil: &Stencil<'_>, increment: &mut FlowField, colour: usize) {
    let (w, h) = (increment.u.w, increment.u.h);
    let row_updates = |y: usize| -> Vec<(usize, f32, f32)> {
        let row = increment.u.index(0, y);
        ((y + colour) % 2..w)
            .step_by(2)
            .map(|x| {
                let i = row + x;
                let (du, dv) = stencil.relax(x, y, i, &increment.u.data, &increment.v.data);
                (i, du, dv)
            })
            .collect()
    };

    #[cfg(feature = "parallel")]
    let updates: Vec<Vec<(usize, f32, f32)>> = (0..h).into_par_iter().map(row_updates).collect();
    #[cfg(not(feature = "parallel"))]
    let updates: Vec<Vec<(usize, f32, f32)>> = (0..h).map(row_updates).collect();

    for (i, du, dv) in updates.into_iter().flatten() {
        increment.u.data[i] = du;
        increment.v.data[i] = dv;
    }
}
