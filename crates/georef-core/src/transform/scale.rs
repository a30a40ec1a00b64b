//! Per-axis scaling from pixel units into geographic-distance units.
//!
//! The horizontal extent of the footprint is the distance between the
//! upper-right and upper-left corners; the vertical extent is the distance
//! between the upper-left and lower-left corners. Dividing each extent by the
//! matching image dimension gives geographic units per pixel, applied as a
//! diagonal map.

use crate::options::DEFAULT_SCALE_TOLERANCE;
use crate::types::{
    CornerEdge, CornerSet, GeoPoint, ImageSize, PixelPoint, Result, ScaleFactor, TransformError,
};

/// Compute the per-axis scale factor for an image footprint.
///
/// # Errors
///
/// - [`TransformError::InvalidImageSize`] if either dimension is not positive
/// - [`TransformError::DegenerateCorner`] if either extent is zero or the
///   corners are collinear
/// - [`TransformError::InconsistentScale`] if the relative difference between
///   the two factors is not below `tolerance`
pub fn scale_factor(
    corners: &CornerSet,
    imagesize: ImageSize,
    tolerance: f64,
) -> Result<ScaleFactor> {
    imagesize.validate()?;
    corners.check_edges()?;

    let width_extent = corners.upper_right.distance(corners.upper_left);
    let height_extent = corners.upper_left.distance(corners.lower_left);
    let factor = ScaleFactor::new(
        width_extent / imagesize.width,
        height_extent / imagesize.height,
    );

    let diff = factor.relative_difference();
    if diff.is_nan() || diff >= tolerance {
        return Err(TransformError::InconsistentScale {
            x_scale: factor.x,
            y_scale: factor.y,
        });
    }

    Ok(factor)
}

/// Scale `point` into geographic-distance units using the default tolerance.
///
/// `point` is a raster coordinate whose rows already count upwards from the
/// bottom edge; the map itself is purely diagonal.
pub fn scale(point: PixelPoint, corners: &CornerSet, imagesize: ImageSize) -> Result<GeoPoint> {
    let factor = scale_factor(corners, imagesize, DEFAULT_SCALE_TOLERANCE)?;
    Ok(factor.apply(point))
}
