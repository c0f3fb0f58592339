//! Error measures between an estimated flow and a ground truth field.
//!
//! - AAE: mean angle in degrees between the space-time vectors `(u, v, 1)`
//!   and `(u_t, v_t, 1)`.
//! - AEE: mean Euclidean distance between the flow vectors.
//!
//! Ground-truth pixels that are non-finite or whose magnitude reaches
//! `UNKNOWN_FLOW_THRESHOLD` are treated as unknown and skipped.
use crate::error::FlowError;
use crate::types::FlowField;
use nalgebra::Vector3;
use serde::Serialize;

/// Ground-truth components at or above this magnitude mark unknown flow.
pub const UNKNOWN_FLOW_THRESHOLD: f32 = 1e9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowErrors {
    /// Average angular error in degrees
    pub aae: f64,
    /// Average endpoint error in pixels
    pub aee: f64,
    /// Mean length of the ground-truth vectors
    pub reference_length: f64,
    /// Mean length of the estimated vectors
    pub computed_length: f64,
    /// Pixels that entered the averages
    pub valid_pixels: usize,
}

/// Compare `calc` against `truth` over the interior.
pub fn flow_errors(truth: &FlowField, calc: &FlowField) -> Result<FlowErrors, FlowError> {
    if (truth.width(), truth.height()) != (calc.width(), calc.height()) {
        return Err(FlowError::GroundTruth(format!(
            "ground truth is {}x{}, estimate is {}x{}",
            truth.width(),
            truth.height(),
            calc.width(),
            calc.height()
        )));
    }

    let mut sum = FlowErrors::default();
    for y in 0..truth.height() {
        for x in 0..truth.width() {
            let (ut, vt) = (truth.u.get(x, y), truth.v.get(x, y));
            if !is_known(ut) || !is_known(vt) {
                continue;
            }
            let (uc, vc) = (calc.u.get(x, y), calc.v.get(x, y));
            sum.aae += angular_error(ut, vt, uc, vc);
            sum.aee += ((uc - ut) as f64).hypot((vc - vt) as f64);
            sum.reference_length += (ut as f64).hypot(vt as f64);
            sum.computed_length += (uc as f64).hypot(vc as f64);
            sum.valid_pixels += 1;
        }
    }

    if sum.valid_pixels == 0 {
        return Err(FlowError::GroundTruth(
            "ground truth has no valid pixels".to_string(),
        ));
    }
    let n = sum.valid_pixels as f64;
    Ok(FlowErrors {
        aae: sum.aae / n,
        aee: sum.aee / n,
        reference_length: sum.reference_length / n,
        computed_length: sum.computed_length / n,
        valid_pixels: sum.valid_pixels,
    })
}

#[inline]
fn is_known(c: f32) -> bool {
    c.is_finite() && c.abs() < UNKNOWN_FLOW_THRESHOLD
}

/// Angle in degrees between `(ut, vt, 1)` and `(uc, vc, 1)`.
pub fn angular_error(ut: f32, vt: f32, uc: f32, vc: f32) -> f64 {
    let t = Vector3::new(ut as f64, vt as f64, 1.0);
    let c = Vector3::new(uc as f64, vc as f64, 1.0);
    let cos = (t.dot(&c) / (t.norm() * c.norm())).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_estimate_has_zero_error() {
        let gt = FlowField::constant(6, 4, 1, 1, 1.5, -0.5);
        let e = flow_errors(&gt, &gt.clone()).unwrap();
        assert!(e.aae.abs() < 1e-6);
        assert!(e.aee.abs() < 1e-9);
        assert_eq!(e.valid_pixels, 24);
        assert!((e.reference_length - e.computed_length).abs() < 1e-9);
    }

    #[test]
    fn unit_offset_from_rest() {
        let gt = FlowField::zeros(3, 3, 1, 1);
        let calc = FlowField::constant(3, 3, 1, 1, 1.0, 0.0);
        let e = flow_errors(&gt, &calc).unwrap();
        assert!((e.aae - 45.0).abs() < 1e-6);
        assert!((e.aee - 1.0).abs() < 1e-9);
        assert_eq!(e.reference_length, 0.0);
    }

    #[test]
    fn unknown_ground_truth_is_skipped() {
        let mut gt = FlowField::zeros(2, 2, 1, 1);
        gt.u.set(0, 0, 1e10);
        gt.v.set(1, 1, f32::NAN);
        let calc = FlowField::zeros(2, 2, 1, 1);
        let e = flow_errors(&gt, &calc).unwrap();
        assert_eq!(e.valid_pixels, 2);

        gt.u.fill(2e9);
        assert!(matches!(flow_errors(&gt, &calc), Err(FlowError::GroundTruth(_))));
    }
}
