//! Georef Core - pixel to geographic coordinate transform
//!
//! This crate maps a pixel inside a rectangular raster image (for example a
//! planetary-surface photograph) to a point in the geographic plane, given the
//! geographic positions of the image corners and the image size in pixels.
//!
//! The corners are treated as points in a flat 2-D plane; there is no datum,
//! projection or lens model.

pub mod options;
pub mod transform;
pub mod types;

pub use options::{TransformMode, TransformOptions, DEFAULT_SCALE_TOLERANCE};
pub use transform::{
    transform, transform_axis_aligned, transform_points, transform_stages,
    transform_with_options, Georeference, RotationEstimate, StageTrace, Transformed,
    TransformWarning,
};
pub use types::{
    CornerEdge, CornerSet, GeoPoint, ImageSize, PixelPoint, Result, ScaleFactor, TransformError,
};
