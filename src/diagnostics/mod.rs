//! Serializable diagnostics for flow estimation runs.
//!
//! `FlowReport` is returned by the estimator and written as JSON by the
//! demo; it records the input geometry, the effective parameters, one
//! `LevelReport` per visited pyramid level and a timing breakdown.

pub mod report;
pub mod timing;

pub use report::{FlowReport, InputDescriptor, LevelReport};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
