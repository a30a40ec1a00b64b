//! Pixel-to-geographic transform: scaling, rotation and translation.
//!
//! # Transform Order
//!
//! Points flow strictly forward through three stages:
//! 1. Scale: pixel units to geographic-distance units, per axis
//! 2. Rotate: by the angle inferred from the dominant corner edge
//! 3. Translate: onto the lower-left corner
//!
//! # Coordinate System
//!
//! - Pixel origin is the top-left corner of the image, rows grow downwards
//! - Geographic points are `(x, y)` in a flat plane, `y` grows upwards
//! - Angles are in radians, positive = counter-clockwise

mod pipeline;
mod rotation;
mod scale;
mod translate;

pub use pipeline::{
    check_bounds, transform, transform_axis_aligned, transform_points, transform_stages,
    transform_with_options, BoundsAxis, Georeference, StageTrace, Transformed, TransformWarning,
};
pub use rotation::{angle_between, estimate_rotation, rotate, DominantAxis, RotationEstimate};
pub use scale::{scale, scale_factor};
pub use translate::translate;
