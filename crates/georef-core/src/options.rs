//! Transform configuration.

use crate::types::{Result, TransformError};
use serde::{Deserialize, Serialize};

/// Default limit for the relative difference between the two axis scale
/// factors (a factor of two between pixel width and pixel height).
pub const DEFAULT_SCALE_TOLERANCE: f64 = 1.0;

/// Which algorithm maps pixels to the geographic plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    /// Scale, infer rotation from the corners, then translate.
    #[default]
    Rotated,
    /// Single-pass degrees-per-pixel mapping that assumes the image is not
    /// rotated relative to the geographic frame.
    AxisAligned,
}

/// Options controlling a transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Algorithm selection.
    pub mode: TransformMode,
    /// Maximum allowed relative difference between the x and y scale
    /// factors. Only used in [`TransformMode::Rotated`].
    pub scale_tolerance: f64,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            mode: TransformMode::Rotated,
            scale_tolerance: DEFAULT_SCALE_TOLERANCE,
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options selecting the axis-aligned fast path.
    pub fn axis_aligned() -> Self {
        Self {
            mode: TransformMode::AxisAligned,
            ..Self::default()
        }
    }

    pub fn with_scale_tolerance(mut self, tolerance: f64) -> Self {
        self.scale_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.scale_tolerance.is_finite() && self.scale_tolerance > 0.0 {
            Ok(())
        } else {
            Err(TransformError::InvalidTolerance(self.scale_tolerance))
        }
    }
}
