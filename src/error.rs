//! Error types for flow estimation and its I/O helpers.
//!
//! Configuration problems are reported before any pyramid level is
//! allocated; the numerical core itself never fails once parameters are
//! accepted.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    /// A solver or pyramid parameter lies outside its valid range
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the configuration
        name: &'static str,
        /// What the accepted range is
        reason: String,
    },

    /// The two frames do not share the same extent
    #[error("frame sizes differ: {first_w}x{first_h} vs {second_w}x{second_h}")]
    SizeMismatch {
        first_w: usize,
        first_h: usize,
        second_w: usize,
        second_h: usize,
    },

    /// A frame has zero width or height
    #[error("input frame is empty ({w}x{h})")]
    EmptyImage { w: usize, h: usize },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("image codec error on {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("ground truth error: {0}")]
    GroundTruth(String),
}

impl FlowError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn image(path: &Path, source: image::ImageError) -> Self {
        Self::Image {
            path: path.display().to_string(),
            source,
        }
    }
}
