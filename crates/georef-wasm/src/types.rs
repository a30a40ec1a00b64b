//! WASM-compatible input types.
//!
//! JavaScript callers pass corners as plain objects holding `[x, y]` arrays;
//! these helpers convert them into the core types.

use georef_core::{CornerSet, GeoPoint, PixelPoint, Transformed};
use serde::Deserialize;

/// Helper struct for deserializing JS corner objects via serde.
///
/// ```typescript
/// const corners = {
///   upper_right: [358.9, 0.91],
///   upper_left: [358.76, 0.9],
///   lower_left: [358.84, -0.62],
///   lower_right: [358.98, -0.61], // optional, unused
/// };
/// ```
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CornersJs {
    upper_right: [f64; 2],
    upper_left: [f64; 2],
    lower_left: [f64; 2],
    #[serde(default)]
    lower_right: Option<[f64; 2]>,
}

impl CornersJs {
    pub(crate) fn into_core(self) -> CornerSet {
        let point = |[x, y]: [f64; 2]| GeoPoint::new(x, y);
        let corners = CornerSet::new(
            point(self.upper_right),
            point(self.upper_left),
            point(self.lower_left),
        );
        match self.lower_right {
            Some(lr) => corners.with_lower_right(point(lr)),
            None => corners,
        }
    }
}

/// Split a flat `[x0, y0, x1, y1, ...]` buffer into pixel points.
pub(crate) fn pairs_to_points(flat: &[f64]) -> Result<Vec<PixelPoint>, String> {
    if flat.len() % 2 != 0 {
        return Err(format!(
            "Point buffer length must be even, got {}",
            flat.len()
        ));
    }
    Ok(flat
        .chunks_exact(2)
        .map(|pair| PixelPoint::new(pair[0], pair[1]))
        .collect())
}

/// Flatten transformed points into `[lon0, lat0, lon1, lat1, ...]`.
pub(crate) fn points_to_flat(points: &[Transformed]) -> Vec<f64> {
    points
        .iter()
        .flat_map(|t| [t.point.x, t.point.y])
        .collect()
}
