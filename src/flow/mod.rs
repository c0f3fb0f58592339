//! Coarse-to-fine warping driver.
//!
//! Overview
//! - Builds the level schedule once from the input size, `eta` and the
//!   requested level count.
//! - Ascends from the coarsest level: resamples both frames to the level
//!   size, carries the accumulated flow over (zero on the coarsest level),
//!   registers the second frame backwards with it and solves for an
//!   increment that is added to the flow.
//! - Flow values are physical displacements; level grid spacings absorb the
//!   size change, so carried-over flow is resampled but never rescaled.
//!
//! Modules
//! - [`params`] – configuration accepted by [`FlowEstimator`].

pub mod params;

pub use params::FlowParams;

use crate::diagnostics::{elapsed_ms, FlowReport, InputDescriptor, LevelReport, TimingBreakdown};
use crate::error::FlowError;
use crate::image::ImageF32;
use crate::pyramid::{resample, LevelDescriptor, WarpSchedule};
use crate::solver::solve_level;
use crate::types::{FlowField, FlowResult};
use crate::warp::backward_registration;

use log::debug;
use std::time::Instant;

/// Robust Horn–Schunck estimator with warping.
#[derive(Clone, Debug)]
pub struct FlowEstimator {
    params: FlowParams,
}

impl FlowEstimator {
    /// Validate `params` and build an estimator around them.
    pub fn new(params: FlowParams) -> Result<Self, FlowError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &FlowParams {
        &self.params
    }

    /// Level schedule the estimator would use for a `w × h` input.
    pub fn schedule(&self, w: usize, h: usize) -> WarpSchedule {
        WarpSchedule::new(
            w,
            h,
            self.params.hx,
            self.params.hy,
            self.params.pyramid.eta,
            self.params.pyramid.levels,
        )
    }

    /// Estimate the flow that carries `f1` onto `f2`.
    ///
    /// Inputs may have any margins; they are copied into working buffers with
    /// the configured border. The returned field has that border as well.
    pub fn estimate(&self, f1: &ImageF32, f2: &ImageF32) -> Result<FlowResult, FlowError> {
        check_inputs(f1, f2)?;
        let total_start = Instant::now();
        let (w, h) = (f1.w, f1.h);
        let (bx, by) = self.params.border;
        let f1 = ImageF32::rebordered(f1, bx, by);
        let f2 = ImageF32::rebordered(f2, bx, by);

        let schedule = self.schedule(w, h);
        debug!(
            "FlowEstimator::estimate {}x{} with {} levels (eta={})",
            w,
            h,
            schedule.len(),
            self.params.pyramid.eta
        );

        let mut timings = TimingBreakdown::default();
        let mut reports = Vec::with_capacity(schedule.len());
        let coarsest = schedule.levels[0];
        let mut flow = FlowField::zeros(coarsest.nx, coarsest.ny, bx, by);

        for level in schedule.iter() {
            let start = Instant::now();
            if (flow.width(), flow.height()) != (level.nx, level.ny) {
                flow = flow.resampled(level.nx, level.ny);
            }
            let mut report = self.solve_on_level(&f1, &f2, level, &mut flow, &mut timings);
            report.elapsed_ms = elapsed_ms(start);
            debug!("FlowEstimator::estimate {}", report.summary());
            reports.push(report);
        }
        timings.total_ms = elapsed_ms(total_start);

        let report = FlowReport {
            input: InputDescriptor {
                width: w,
                height: h,
                pyramid_levels: schedule.len(),
            },
            params: self.params,
            levels: reports,
            timings,
        };
        Ok(FlowResult { flow, report })
    }

    /// Warp, solve and accumulate on one level, timing each stage.
    fn solve_on_level(
        &self,
        f1: &ImageF32,
        f2: &ImageF32,
        level: &LevelDescriptor,
        flow: &mut FlowField,
        timings: &mut TimingBreakdown,
    ) -> LevelReport {
        let depth = level.depth;
        let (mut f1_level, mut f2_level) = timings.measure(format!("level {depth} resample"), || {
            (
                resample(f1, level.nx, level.ny),
                resample(f2, level.nx, level.ny),
            )
        });
        let mean_intensity = f1_level.mean();

        let mut f2_warped = timings.measure(format!("level {depth} warp"), || {
            backward_registration(&f1_level, &mut f2_level, flow, level.hx, level.hy)
        });
        let solution = timings.measure(format!("level {depth} solve"), || {
            solve_level(
                &mut f1_level,
                &mut f2_warped,
                flow,
                level.hx,
                level.hy,
                &self.params.solver,
            )
        });
        flow.add_assign(&solution.increment);

        let (mu, mv) = flow.mean();
        LevelReport {
            level: *level,
            mean_intensity,
            elapsed_ms: 0.0,
            stats: solution.stats,
            mean_flow: [mu, mv],
            max_magnitude: flow.max_magnitude(),
        }
    }
}

/// Reject empty or mismatched frames before any level is allocated.
fn check_inputs(f1: &ImageF32, f2: &ImageF32) -> Result<(), FlowError> {
    if f1.w == 0 || f1.h == 0 {
        return Err(FlowError::EmptyImage { w: f1.w, h: f1.h });
    }
    if (f1.w, f1.h) != (f2.w, f2.h) {
        return Err(FlowError::SizeMismatch {
            first_w: f1.w,
            first_h: f1.h,
            second_w: f2.w,
            second_h: f2.h,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_and_empty_frames() {
        let est = FlowEstimator::new(FlowParams::default()).unwrap();
        let a = ImageF32::new(8, 8);
        let b = ImageF32::new(8, 7);
        assert!(matches!(est.estimate(&a, &b), Err(FlowError::SizeMismatch { .. })));
        let e = ImageF32::new(0, 8);
        assert!(matches!(est.estimate(&e, &e), Err(FlowError::EmptyImage { .. })));
    }

    #[test]
    fn rejects_invalid_params_up_front() {
        let mut p = FlowParams::default();
        p.solver.omega = 2.5;
        assert!(FlowEstimator::new(p).is_err());
    }

    #[test]
    fn report_lists_levels_coarse_to_fine() {
        let f = ImageF32::from_fn(32, 24, 0, 0, |x, y| ((x * 3 + y * 5) % 11) as f32 * 20.0);
        let params = FlowParams::default().with_levels(3).with_iterations(1, 2);
        let est = FlowEstimator::new(params).unwrap();
        let res = est.estimate(&f, &f).unwrap();
        assert_eq!(res.report.levels.len(), 3);
        assert_eq!(res.report.levels[0].level.depth, 2);
        let finest = res.report.finest().unwrap();
        assert_eq!((finest.level.nx, finest.level.ny), (32, 24));
        assert_eq!((res.flow.width(), res.flow.height()), (32, 24));
        let stages = &res.report.timings.stages;
        assert_eq!(stages.len(), 9);
        assert_eq!(stages[0].label, "level 2 resample");
        assert_eq!(stages[8].label, "level 0 solve");
        assert!(res.report.timings.stage_sum_ms() <= res.report.timings.total_ms);
    }
}
