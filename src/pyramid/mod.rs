//! Coarse-to-fine pyramid support: level schedule, parameters and the
//! area resampler used to move images and flow fields between levels.
//!
//! Unlike a dyadic image pyramid, levels are not stored; the driver resamples
//! the full-resolution frames directly to each level's size as it ascends.

pub mod options;
pub mod resample;
pub mod schedule;

pub use options::PyramidParams;
pub use resample::{resample, resample_into};
pub use schedule::{compute_max_warp_levels, LevelDescriptor, WarpSchedule};
