//! Rotation-angle inference from the corner geometry.
//!
//! Two candidate angles are measured independently:
//!
//! ```text
//! angle_x = -angle_between(ul - ur, (-1,  0))
//! angle_y = -angle_between(ll - ul, ( 0, -1))
//! ```
//!
//! where `angle_between` is the unsigned angle in `[0, π]`. The candidate
//! with the larger magnitude wins (the "dominant axis"), and the whole image
//! is rotated by that single angle:
//!
//! ```text
//! x' = x * cos(θ) - y * sin(θ)
//! y' = x * sin(θ) + y * cos(θ)
//! ```
//!
//! Because `angle_between` is unsigned, both candidates are always `<= 0`.

use crate::types::{CornerEdge, CornerSet, GeoPoint, Result, TransformError};
use serde::{Deserialize, Serialize};

/// Reference direction of the top edge, walking from upper-right to upper-left.
const TOP_REFERENCE: GeoPoint = GeoPoint { x: -1.0, y: 0.0 };

/// Reference direction of the left edge, walking from upper-left to lower-left.
const LEFT_REFERENCE: GeoPoint = GeoPoint { x: 0.0, y: -1.0 };

/// Which corner edge supplied the applied rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DominantAxis {
    /// The top edge (`angle_x`).
    X,
    /// The left edge (`angle_y`).
    Y,
}

/// Candidate angles and the one selected for the rotation, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationEstimate {
    /// Angle inferred from the top edge.
    pub angle_x: f64,
    /// Angle inferred from the left edge.
    pub angle_y: f64,
    /// The applied angle (one of the two candidates).
    pub angle: f64,
    /// Which candidate was selected.
    pub axis: DominantAxis,
}

impl RotationEstimate {
    /// Pick the candidate with the larger magnitude. Ties go to `angle_x`.
    pub fn from_candidates(angle_x: f64, angle_y: f64) -> Self {
        let (angle, axis) = if angle_y.abs() > angle_x.abs() {
            (angle_y, DominantAxis::Y)
        } else {
            (angle_x, DominantAxis::X)
        };
        Self {
            angle_x,
            angle_y,
            angle,
            axis,
        }
    }

    /// Rotate `point` about the origin by the selected angle.
    #[inline]
    pub fn apply(&self, point: GeoPoint) -> GeoPoint {
        let (sin, cos) = self.angle.sin_cos();
        GeoPoint::new(
            point.x * cos - point.y * sin,
            point.x * sin + point.y * cos,
        )
    }
}

/// Unsigned angle between two vectors, in `[0, π]`.
///
/// Returns `None` when either vector has zero length. The cosine is clamped
/// to `[-1, 1]` so nearly parallel vectors cannot produce NaN.
pub fn angle_between(v1: GeoPoint, v2: GeoPoint) -> Option<f64> {
    let denom = v1.norm() * v2.norm();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((v1.dot(v2) / denom).clamp(-1.0, 1.0).acos())
}

/// Infer the rotation of the image frame relative to the geographic frame.
///
/// # Errors
///
/// [`TransformError::DegenerateCorner`] if the top or left edge has zero
/// length, or the two edges are collinear.
pub fn estimate_rotation(corners: &CornerSet) -> Result<RotationEstimate> {
    corners.check_edges()?;

    let angle_x = angle_between(corners.top_edge(), TOP_REFERENCE).ok_or(
        TransformError::DegenerateCorner {
            edge: CornerEdge::Top,
        },
    )?;
    let angle_y = angle_between(corners.left_edge(), LEFT_REFERENCE).ok_or(
        TransformError::DegenerateCorner {
            edge: CornerEdge::Left,
        },
    )?;

    let estimate = RotationEstimate::from_candidates(-angle_x, -angle_y);
    log::debug!(
        "rotation candidates x={} y={}, using {:?}-axis angle {}",
        estimate.angle_x,
        estimate.angle_y,
        estimate.axis,
        estimate.angle
    );
    Ok(estimate)
}

/// Rotate a scaled point to match the orientation of the geographic frame.
pub fn rotate(point: GeoPoint, corners: &CornerSet) -> Result<GeoPoint> {
    Ok(estimate_rotation(corners)?.apply(point))
}
