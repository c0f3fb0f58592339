//! Robust weights re-linearizing the data and smoothness penalties.
//!
//! Both updates are pointwise given their inputs and are recomputed at the
//! start of every outer iteration of a level solve.
use crate::derivatives::central_gradient;
use crate::diffusivity::Diffusivity;
use crate::image::ImageF32;
use crate::tensor::{interior_indices, MotionTensor};
use crate::types::FlowField;

/// Weight fields `ψd` and `ψs` of one level.
#[derive(Clone, Debug)]
pub struct Nonlinearities {
    pub data: ImageF32,
    pub smooth: ImageF32,
}

impl Nonlinearities {
    /// Unit weights, i.e. the quadratic (non-robust) functional.
    pub fn ones_like(like: &ImageF32) -> Self {
        let mut data = like.zeros_like();
        data.fill(1.0);
        let smooth = data.clone();
        Self { data, smooth }
    }
}

/// `ψd = Ψ'((du, dv, 1) J (du, dv, 1)ᵀ)`, the residual clamped at zero.
pub fn update_data_weights(
    tensor: &MotionTensor,
    increment: &FlowField,
    diffusivity: Diffusivity,
    eps: f32,
    psi: &mut ImageF32,
) {
    let (du, dv) = (&increment.u, &increment.v);
    for i in interior_indices(psi) {
        let help = tensor.residual_at(i, du.data[i], dv.data[i]).max(0.0);
        psi.data[i] = diffusivity.weight(help, eps);
    }
}

/// `ψs = Ψ'(|∇(u+du)|² + |∇(v+dv)|²)`.
///
/// Mirrors the margins of all four flow fields before differencing.
pub fn update_smoothness_weights(
    flow: &mut FlowField,
    increment: &mut FlowField,
    hx: f32,
    hy: f32,
    diffusivity: Diffusivity,
    eps: f32,
    psi: &mut ImageF32,
) {
    flow.mirror_bounds();
    increment.mirror_bounds();

    let (ux, uy) = central_gradient(&flow.u, hx, hy);
    let (vx, vy) = central_gradient(&flow.v, hx, hy);
    let (dux, duy) = central_gradient(&increment.u, hx, hy);
    let (dvx, dvy) = central_gradient(&increment.v, hx, hy);

    for i in interior_indices(psi) {
        let gx_u = ux.data[i] + dux.data[i];
        let gy_u = uy.data[i] + duy.data[i];
        let gx_v = vx.data[i] + dvx.data[i];
        let gy_v = vy.data[i] + dvy.data[i];
        let help = gx_u * gx_u + gy_u * gy_u + gx_v * gx_v + gy_v * gy_v;
        psi.data[i] = diffusivity.weight(help, eps);
    }
}
