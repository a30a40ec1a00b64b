//! Pixel-to-geographic transform orchestration.
//!
//! A [`Georeference`] validates the corners and image size once, then maps
//! any number of pixel points. The free functions ([`transform`],
//! [`transform_axis_aligned`], ...) are one-shot conveniences over it.
//!
//! Points outside the declared image extent are not an error: they
//! extrapolate the transform and carry a [`TransformWarning`] alongside the
//! result. Every warning is also emitted through the `log` facade.

use super::rotation::{estimate_rotation, RotationEstimate};
use super::scale::scale_factor;
use super::translate::translate;
use crate::options::{TransformMode, TransformOptions};
use crate::types::{
    CornerEdge, CornerSet, GeoPoint, ImageSize, PixelPoint, Result, ScaleFactor, TransformError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Image axis a bounds warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundsAxis {
    X,
    Y,
}

/// Non-fatal diagnostic produced while transforming a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransformWarning {
    /// Pixel coordinate outside `[0, limit]` on `axis`.
    OutOfBounds {
        axis: BoundsAxis,
        value: f64,
        limit: f64,
    },
}

impl fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformWarning::OutOfBounds { axis, value, limit } => {
                let (name, extent) = match axis {
                    BoundsAxis::X => ("x", "image-width"),
                    BoundsAxis::Y => ("y", "image-height"),
                };
                write!(
                    f,
                    "point {name} coordinate (={value}) not in {extent} (={limit})"
                )
            }
        }
    }
}

/// Check `point` against the image extent, logging every violation.
pub fn check_bounds(point: PixelPoint, imagesize: ImageSize) -> Vec<TransformWarning> {
    let mut warnings = Vec::new();
    for (axis, value, limit) in [
        (BoundsAxis::X, point.x, imagesize.width),
        (BoundsAxis::Y, point.y, imagesize.height),
    ] {
        if !(0.0..=limit).contains(&value) {
            let warning = TransformWarning::OutOfBounds { axis, value, limit };
            log::warn!("{warning}");
            warnings.push(warning);
        }
    }
    warnings
}

/// A transformed point together with any diagnostics raised on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformed {
    pub point: GeoPoint,
    pub warnings: Vec<TransformWarning>,
}

impl Transformed {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Every intermediate stage of a single point's transform, for plotting and
/// sanity checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// The input pixel point.
    pub pixel: PixelPoint,
    /// After per-axis scaling.
    pub scaled: GeoPoint,
    /// After rotation (equal to `scaled` in axis-aligned mode).
    pub rotated: GeoPoint,
    /// Final geographic position.
    pub geo: GeoPoint,
    pub warnings: Vec<TransformWarning>,
}

impl From<StageTrace> for Transformed {
    fn from(trace: StageTrace) -> Self {
        Self {
            point: trace.geo,
            warnings: trace.warnings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kernel {
    Rotated {
        scale: ScaleFactor,
        rotation: RotationEstimate,
        anchor: GeoPoint,
    },
    AxisAligned {
        deg_per_px: ScaleFactor,
        origin: GeoPoint,
    },
}

/// A validated pixel-to-geographic mapping for one image footprint.
///
/// Holds no mutable state; it can be shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Georeference {
    imagesize: ImageSize,
    mode: TransformMode,
    kernel: Kernel,
}

impl Georeference {
    /// Validate the inputs and precompute the per-footprint quantities.
    ///
    /// # Errors
    ///
    /// Any [`TransformError`] other than `NonFinite("pixel point")`. In
    /// axis-aligned mode only the signed corner deltas are checked: a zero
    /// x or y delta is a [`TransformError::DegenerateCorner`].
    pub fn new(
        corners: &CornerSet,
        imagesize: ImageSize,
        options: &TransformOptions,
    ) -> Result<Self> {
        options.validate()?;
        imagesize.validate()?;
        corners.validate()?;

        let kernel = match options.mode {
            TransformMode::Rotated => Kernel::Rotated {
                scale: scale_factor(corners, imagesize, options.scale_tolerance)?,
                rotation: estimate_rotation(corners)?,
                anchor: corners.lower_left,
            },
            TransformMode::AxisAligned => {
                let deg_per_px = ScaleFactor::new(
                    (corners.upper_right.x - corners.upper_left.x) / imagesize.width,
                    (corners.upper_left.y - corners.lower_left.y) / imagesize.height,
                );
                let edge = if deg_per_px.x == 0.0 {
                    Some(CornerEdge::Top)
                } else if deg_per_px.y == 0.0 {
                    Some(CornerEdge::Left)
                } else {
                    None
                };
                if let Some(edge) = edge {
                    return Err(TransformError::DegenerateCorner { edge });
                }
                Kernel::AxisAligned {
                    deg_per_px,
                    origin: corners.upper_left,
                }
            }
        };

        Ok(Self {
            imagesize,
            mode: options.mode,
            kernel,
        })
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn imagesize(&self) -> ImageSize {
        self.imagesize
    }

    /// Geographic units per pixel on each axis. In axis-aligned mode these
    /// are the signed degree deltas along x and y.
    pub fn scale_factor(&self) -> ScaleFactor {
        match self.kernel {
            Kernel::Rotated { scale, .. } => scale,
            Kernel::AxisAligned { deg_per_px, .. } => deg_per_px,
        }
    }

    /// The inferred rotation, or `None` in axis-aligned mode.
    pub fn rotation(&self) -> Option<RotationEstimate> {
        match self.kernel {
            Kernel::Rotated { rotation, .. } => Some(rotation),
            Kernel::AxisAligned { .. } => None,
        }
    }

    /// Transform one pixel point, recording every intermediate stage.
    pub fn trace(&self, pointpx: PixelPoint) -> Result<StageTrace> {
        if !pointpx.is_finite() {
            return Err(TransformError::NonFinite("pixel point"));
        }
        let warnings = check_bounds(pointpx, self.imagesize);

        let (scaled, rotated, geo) = match self.kernel {
            Kernel::Rotated {
                scale,
                rotation,
                anchor,
            } => {
                let scaled = scale.apply(pointpx.rows_from_bottom(self.imagesize.height));
                let rotated = rotation.apply(scaled);
                (scaled, rotated, translate(rotated, anchor))
            }
            Kernel::AxisAligned { deg_per_px, origin } => {
                // Rows grow downwards from the upper-left corner.
                let scaled = GeoPoint::new(pointpx.x * deg_per_px.x, -pointpx.y * deg_per_px.y);
                (scaled, scaled, translate(scaled, origin))
            }
        };

        Ok(StageTrace {
            pixel: pointpx,
            scaled,
            rotated,
            geo,
            warnings,
        })
    }

    /// Transform one pixel point.
    pub fn apply(&self, pointpx: PixelPoint) -> Result<Transformed> {
        self.trace(pointpx).map(Transformed::from)
    }

    /// Transform a list of points independently. Fails on the first
    /// non-finite point.
    pub fn apply_points(&self, points: &[PixelPoint]) -> Result<Vec<Transformed>> {
        points.iter().map(|&p| self.apply(p)).collect()
    }
}

/// Transform `pointpx` into the geographic plane with the default options
/// (scale, rotate, translate).
///
/// # Example
///
/// ```ignore
/// use georef_core::{transform, CornerSet, GeoPoint, ImageSize, PixelPoint};
///
/// let corners = CornerSet::new(
///     GeoPoint::new(20.0, 10.0),
///     GeoPoint::new(10.0, 10.0),
///     GeoPoint::new(10.0, 5.0),
/// );
/// let out = transform(PixelPoint::new(0.0, 100.0), &corners, ImageSize::new(200, 100))?;
/// assert_eq!(out.point, GeoPoint::new(10.0, 5.0));
/// ```
pub fn transform(
    pointpx: PixelPoint,
    corners: &CornerSet,
    imagesize: ImageSize,
) -> Result<Transformed> {
    transform_with_options(pointpx, corners, imagesize, &TransformOptions::default())
}

/// Transform `pointpx` with explicit options.
pub fn transform_with_options(
    pointpx: PixelPoint,
    corners: &CornerSet,
    imagesize: ImageSize,
    options: &TransformOptions,
) -> Result<Transformed> {
    Georeference::new(corners, imagesize, options)?.apply(pointpx)
}

/// Single-pass degrees-per-pixel transform for footprints that are not
/// rotated relative to the geographic frame.
pub fn transform_axis_aligned(
    pointpx: PixelPoint,
    corners: &CornerSet,
    imagesize: ImageSize,
) -> Result<Transformed> {
    transform_with_options(pointpx, corners, imagesize, &TransformOptions::axis_aligned())
}

/// Transform `pointpx` and return every intermediate stage.
pub fn transform_stages(
    pointpx: PixelPoint,
    corners: &CornerSet,
    imagesize: ImageSize,
    options: &TransformOptions,
) -> Result<StageTrace> {
    Georeference::new(corners, imagesize, options)?.trace(pointpx)
}

/// Transform a list of points against one footprint.
pub fn transform_points(
    points: &[PixelPoint],
    corners: &CornerSet,
    imagesize: ImageSize,
    options: &TransformOptions,
) -> Result<Vec<Transformed>> {
    Georeference::new(corners, imagesize, options)?.apply_points(points)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Footprint rotated clockwise by `theta` around a lower-left anchor, with
    /// pixel sizes that differ by at most 20% between axes.
    fn footprint_strategy() -> impl Strategy<Value = (CornerSet, ImageSize)> {
        (
            -180.0f64..180.0,
            -90.0f64..90.0,
            prop_oneof![Just(0.0f64), -0.5f64..-0.001],
            1e-4f64..1e-2,
            0.8f64..1.2,
            10u32..=10_000,
            10u32..=10_000,
        )
            .prop_map(|(lon, lat, theta, scale, ratio, w, h)| {
                let hext = scale * w as f64;
                let vext = scale * ratio * h as f64;
                let ll = GeoPoint::new(lon, lat);
                let ul = ll.add(GeoPoint::new(-vext * theta.sin(), vext * theta.cos()));
                let ur = ul.add(GeoPoint::new(hext * theta.cos(), hext * theta.sin()));
                (CornerSet::new(ur, ul, ll), ImageSize::new(w, h))
            })
    }

    /// Pixel position as a fraction of the image extent.
    fn fraction_strategy() -> impl Strategy<Value = (f64, f64)> {
        (0.0f64..=1.0, 0.0f64..=1.0)
    }

    fn close(a: GeoPoint, b: GeoPoint, tol: f64) -> bool {
        (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol
    }

    proptest! {
        /// Property: the lower-left and upper-right pixels land on their corners.
        #[test]
        fn prop_corner_fixed_points((corners, size) in footprint_strategy()) {
            let georef = Georeference::new(&corners, size, &TransformOptions::default()).unwrap();

            let ll = georef.apply(PixelPoint::new(0.0, size.height)).unwrap();
            let ur = georef.apply(PixelPoint::new(size.width, 0.0)).unwrap();

            prop_assert!(close(ll.point, corners.lower_left, 1e-9), "{:?}", ll.point);
            prop_assert!(
                close(ur.point, corners.upper_right, 1e-6),
                "{:?} vs {:?}",
                ur.point,
                corners.upper_right
            );
        }

        /// Property: the transform is affine, so midpoints map to midpoints.
        #[test]
        fn prop_midpoint_linearity(
            (corners, size) in footprint_strategy(),
            (fx1, fy1) in fraction_strategy(),
            (fx2, fy2) in fraction_strategy(),
        ) {
            let georef = Georeference::new(&corners, size, &TransformOptions::default()).unwrap();
            let p1 = PixelPoint::new(fx1 * size.width, fy1 * size.height);
            let p2 = PixelPoint::new(fx2 * size.width, fy2 * size.height);
            let m = PixelPoint::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);

            let t1 = georef.apply(p1).unwrap().point;
            let t2 = georef.apply(p2).unwrap().point;
            let tm = georef.apply(m).unwrap().point;

            prop_assert!(close(tm, t1.midpoint(t2), 1e-9));
        }

        /// Property: in-bounds points never warn.
        #[test]
        fn prop_in_bounds_no_warnings(
            (corners, size) in footprint_strategy(),
            (fx, fy) in fraction_strategy(),
        ) {
            let pointpx = PixelPoint::new(fx * size.width, fy * size.height);
            let out = transform(pointpx, &corners, size).unwrap();
            prop_assert!(!out.has_warnings());
        }

        /// Property: out-of-bounds points warn but still produce a finite point.
        #[test]
        fn prop_out_of_bounds_still_transforms(
            (corners, size) in footprint_strategy(),
            overshoot in 1.0f64..1000.0,
        ) {
            let p = PixelPoint::new(size.width + overshoot, -overshoot);
            let out = transform(p, &corners, size).unwrap();
            prop_assert_eq!(out.warnings.len(), 2);
            prop_assert!(out.point.is_finite());
        }

        /// Property: with no rotation the general and axis-aligned transforms agree.
        #[test]
        fn prop_agrees_with_axis_aligned_when_unrotated(
            lon in -180.0f64..180.0,
            lat in -90.0f64..90.0,
            scale in 1e-4f64..1e-2,
            (w, h) in (10u32..=10_000, 10u32..=10_000),
            (fx, fy) in fraction_strategy(),
        ) {
            let ll = GeoPoint::new(lon, lat);
            let ul = GeoPoint::new(lon, lat + scale * h as f64);
            let ur = GeoPoint::new(lon + scale * w as f64, ul.y);
            let corners = CornerSet::new(ur, ul, ll);
            let size = ImageSize::new(w, h);
            let p = PixelPoint::new(fx * size.width, fy * size.height);

            let rotated = transform(p, &corners, size).unwrap();
            let flat = transform_axis_aligned(p, &corners, size).unwrap();
            prop_assert!(close(rotated.point, flat.point, 1e-9));
        }
    }
}
