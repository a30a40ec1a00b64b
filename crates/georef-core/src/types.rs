//! Core value types for georeferencing.
//!
//! Every type here is an immutable `Copy` value. Pixel coordinates use the
//! image's own raster grid (origin top-left, rows growing downwards);
//! geographic coordinates live in a flat 2-D plane with the second component
//! growing "up" (e.g. `(longitude, latitude)`).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sine of the angle between the top and left edges below which the corners
/// are treated as collinear.
pub const COLLINEAR_EPSILON: f64 = 1e-9;

/// Error types for georeferencing operations.
///
/// All variants are fatal for the call that produced them and are a pure
/// function of the input, so retrying with the same input is pointless.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The two per-axis scale factors imply very different pixel sizes,
    /// which usually means the corners were supplied in the wrong order.
    #[error("Scale is too different: x-scale={x_scale} y-scale={y_scale}")]
    InconsistentScale { x_scale: f64, y_scale: f64 },

    /// Two adjacent corners coincide, or the three corners lie on one line,
    /// so neither scale nor rotation can be inferred from them.
    #[error("Degenerate corners: {edge}")]
    DegenerateCorner { edge: CornerEdge },

    /// Image width or height is not a positive finite number.
    #[error("Invalid image size: {width}x{height}")]
    InvalidImageSize { width: f64, height: f64 },

    /// A pixel or corner coordinate is NaN or infinite.
    #[error("Non-finite coordinate in {0}")]
    NonFinite(&'static str),

    /// The scale-consistency tolerance is not a positive finite number.
    #[error("Invalid scale tolerance: {0}")]
    InvalidTolerance(f64),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TransformError>;

/// The corner edge an error or an angle estimate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CornerEdge {
    /// Upper-left to upper-right.
    Top,
    /// Upper-left to lower-left.
    Left,
    /// Top and left edges together, when they are parallel.
    Both,
}

impl fmt::Display for CornerEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CornerEdge::Top => f.write_str("top edge (upper-left to upper-right) has zero length"),
            CornerEdge::Left => f.write_str("left edge (upper-left to lower-left) has zero length"),
            CornerEdge::Both => f.write_str("top and left edges are collinear"),
        }
    }
}

/// A point in image raster units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Column (0 = left edge).
    pub x: f64,
    /// Row (0 = top edge).
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Re-express the point with rows counted upwards from the bottom edge,
    /// matching the orientation of the geographic plane.
    #[inline]
    pub(crate) fn rows_from_bottom(self, height: f64) -> Self {
        Self {
            x: self.x,
            y: height - self.y,
        }
    }
}

/// A point in the geographic plane. Also used for the intermediate scaled
/// and rotated stages, which share the same units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// First coordinate (longitude-like).
    pub x: f64,
    /// Second coordinate (latitude-like).
    pub y: f64,
}

impl GeoPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn sub(self, other: GeoPoint) -> GeoPoint {
        GeoPoint::new(self.x - other.x, self.y - other.y)
    }

    #[inline]
    pub fn add(self, other: GeoPoint) -> GeoPoint {
        GeoPoint::new(self.x + other.x, self.y + other.y)
    }

    #[inline]
    pub fn dot(self, other: GeoPoint) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3-D cross product of the two vectors.
    #[inline]
    pub fn cross(self, other: GeoPoint) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Euclidean length when the point is read as a vector.
    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: GeoPoint) -> f64 {
        self.sub(other).norm()
    }

    /// Midpoint between `self` and `other`.
    pub fn midpoint(self, other: GeoPoint) -> GeoPoint {
        GeoPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    /// Create an image size from integer pixel counts.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    /// Check that both dimensions are positive and finite.
    pub fn validate(&self) -> Result<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(TransformError::InvalidImageSize {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Geographic positions of the image corners.
///
/// Only the upper-right, upper-left and lower-left corners drive the
/// transform. The lower-right corner is carried along for callers that
/// have it, but never read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerSet {
    pub upper_right: GeoPoint,
    pub upper_left: GeoPoint,
    pub lower_left: GeoPoint,
    #[serde(default)]
    pub lower_right: Option<GeoPoint>,
}

impl CornerSet {
    /// Create a corner set from the three corners the transform consumes.
    pub fn new(upper_right: GeoPoint, upper_left: GeoPoint, lower_left: GeoPoint) -> Self {
        Self {
            upper_right,
            upper_left,
            lower_left,
            lower_right: None,
        }
    }

    /// Attach the (unused) lower-right corner.
    pub fn with_lower_right(mut self, lower_right: GeoPoint) -> Self {
        self.lower_right = Some(lower_right);
        self
    }

    /// Check that every corner the transform reads is finite.
    pub fn validate(&self) -> Result<()> {
        let corners = [self.upper_right, self.upper_left, self.lower_left];
        if corners.iter().all(GeoPoint::is_finite) {
            Ok(())
        } else {
            Err(TransformError::NonFinite("corners"))
        }
    }

    /// Check that the top and left edges have length and span the plane.
    ///
    /// # Errors
    ///
    /// [`TransformError::DegenerateCorner`] naming the zero-length edge, or
    /// [`CornerEdge::Both`] when the three corners lie on one line.
    pub fn check_edges(&self) -> Result<()> {
        let top = self.top_edge();
        let left = self.left_edge();
        let (top_len, left_len) = (top.norm(), left.norm());

        let edge = if top_len <= 0.0 {
            CornerEdge::Top
        } else if left_len <= 0.0 {
            CornerEdge::Left
        } else if top.cross(left).abs() <= COLLINEAR_EPSILON * top_len * left_len {
            CornerEdge::Both
        } else {
            return Ok(());
        };
        Err(TransformError::DegenerateCorner { edge })
    }

    /// Vector along the top edge, from upper-right to upper-left.
    #[inline]
    pub fn top_edge(&self) -> GeoPoint {
        self.upper_left.sub(self.upper_right)
    }

    /// Vector along the left edge, from upper-left to lower-left.
    #[inline]
    pub fn left_edge(&self) -> GeoPoint {
        self.lower_left.sub(self.upper_left)
    }
}

/// Per-axis geographic units per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactor {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Relative difference between the two axes, measured against the
    /// smaller one so that the check is symmetric in `x` and `y`.
    pub fn relative_difference(&self) -> f64 {
        (self.x - self.y).abs() / self.x.abs().min(self.y.abs())
    }

    /// Apply the diagonal scale to a raster point.
    #[inline]
    pub fn apply(&self, point: PixelPoint) -> GeoPoint {
        GeoPoint::new(point.x * self.x, point.y * self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size_validate() {
        assert!(ImageSize::new(100, 50).validate().is_ok());
        assert!(ImageSize::new(0, 50).validate().is_err());

        let size = ImageSize {
            width: f64::NAN,
            height: 10.0,
        };
        assert!(matches!(
            size.validate(),
            Err(TransformError::InvalidImageSize { .. })
        ));
    }

    #[test]
    fn test_geo_point_arithmetic() {
        let a = GeoPoint::new(3.0, 4.0);
        let b = GeoPoint::new(1.0, 1.0);

        assert_eq!(a.sub(b), GeoPoint::new(2.0, 3.0));
        assert_eq!(a.add(b), GeoPoint::new(4.0, 5.0));
        assert!((a.norm() - 5.0).abs() < 1e-12);
        assert!((a.dot(b) - 7.0).abs() < 1e-12);
        assert_eq!(a.midpoint(b), GeoPoint::new(2.0, 2.5));
    }

    #[test]
    fn test_rows_from_bottom() {
        let p = PixelPoint::new(10.0, 0.0).rows_from_bottom(50.0);
        assert_eq!(p, PixelPoint::new(10.0, 50.0));
    }

    #[test]
    fn test_scale_factor_relative_difference_is_symmetric() {
        let a = ScaleFactor::new(1.0, 3.0);
        let b = ScaleFactor::new(3.0, 1.0);
        assert!((a.relative_difference() - 2.0).abs() < 1e-12);
        assert!((a.relative_difference() - b.relative_difference()).abs() < 1e-12);
    }

    #[test]
    fn test_corner_set_edges() {
        let corners = CornerSet::new(
            GeoPoint::new(10.0, 5.0),
            GeoPoint::new(0.0, 5.0),
            GeoPoint::new(0.0, 0.0),
        );
        assert_eq!(corners.top_edge(), GeoPoint::new(-10.0, 0.0));
        assert_eq!(corners.left_edge(), GeoPoint::new(0.0, -5.0));
        assert!(corners.lower_right.is_none());
    }

    #[test]
    fn test_check_edges() {
        let corners = CornerSet::new(
            GeoPoint::new(10.0, 5.0),
            GeoPoint::new(0.0, 5.0),
            GeoPoint::new(0.0, 0.0),
        );
        assert!(corners.check_edges().is_ok());

        let coincident = CornerSet::new(
            GeoPoint::new(0.0, 5.0),
            GeoPoint::new(0.0, 5.0),
            GeoPoint::new(0.0, 0.0),
        );
        assert_eq!(
            coincident.check_edges(),
            Err(TransformError::DegenerateCorner {
                edge: CornerEdge::Top
            })
        );
    }

    #[test]
    fn test_check_edges_collinear() {
        let corners = CornerSet::new(
            GeoPoint::new(10.0, 0.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(-10.0, 0.0),
        );
        assert_eq!(
            corners.check_edges(),
            Err(TransformError::DegenerateCorner {
                edge: CornerEdge::Both
            })
        );
    }

    #[test]
    fn test_geo_point_cross() {
        let x = GeoPoint::new(1.0, 0.0);
        let y = GeoPoint::new(0.0, 1.0);
        assert!((x.cross(y) - 1.0).abs() < 1e-12);
        assert!((y.cross(x) + 1.0).abs() < 1e-12);
        assert!(x.cross(GeoPoint::new(-3.0, 0.0)).abs() < 1e-12);
    }

    #[test]
    fn test_corner_set_rejects_nan() {
        let corners = CornerSet::new(
            GeoPoint::new(f64::NAN, 5.0),
            GeoPoint::new(0.0, 5.0),
            GeoPoint::new(0.0, 0.0),
        );
        assert_eq!(
            corners.validate(),
            Err(TransformError::NonFinite("corners"))
        );
    }

    #[test]
    fn test_transform_error_display() {
        let err = TransformError::InconsistentScale {
            x_scale: 1.0,
            y_scale: 3.0,
        };
        assert_eq!(err.to_string(), "Scale is too different: x-scale=1 y-scale=3");

        let err = TransformError::DegenerateCorner {
            edge: CornerEdge::Top,
        };
        assert!(err.to_string().contains("top"));
    }
}
