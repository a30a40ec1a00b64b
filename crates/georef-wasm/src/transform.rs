//! WASM bindings for the pixel-to-geographic transform.
//!
//! This module exposes a `JsGeoreference` class that validates a footprint
//! once and maps pixel points on demand, plus a one-shot `transform` function.
//! Out-of-bounds warnings are forwarded to the browser console.

use crate::types::{pairs_to_points, points_to_flat, CornersJs};
use georef_core::transform::DominantAxis;
use georef_core::{
    Georeference, ImageSize, PixelPoint, StageTrace, TransformOptions, TransformWarning,
    Transformed,
};
use wasm_bindgen::prelude::*;

fn to_js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn forward_warnings(warnings: &[TransformWarning]) {
    for warning in warnings {
        web_sys::console::warn_1(&JsValue::from_str(&warning.to_string()));
    }
}

fn parse_options(options: JsValue) -> Result<TransformOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(TransformOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| to_js_error(format!("Invalid transform options: {}", e)))
}

fn parse_corners(corners: JsValue) -> Result<CornersJs, JsValue> {
    serde_wasm_bindgen::from_value(corners)
        .map_err(|e| to_js_error(format!("Invalid corners: {}", e)))
}

/// A validated image footprint that maps pixel points to the geographic plane.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const georef = new JsGeoreference(corners, 5064, 52224, { mode: 'rotated' });
/// const [lon, lat] = georef.apply(2532, 26112);
/// console.log(`rotation ${georef.rotation_angle} rad`);
/// ```
#[wasm_bindgen]
pub struct JsGeoreference {
    inner: Georeference,
}

#[wasm_bindgen]
impl JsGeoreference {
    /// Create a georeference from corners and image size.
    ///
    /// # Arguments
    /// * `corners` - `{upper_right, upper_left, lower_left, lower_right?}` with `[x, y]` arrays
    /// * `width`, `height` - Image size in pixels
    /// * `options` - Optional `{mode: 'rotated' | 'axis_aligned', scale_tolerance}`
    ///
    /// # Errors
    /// Returns error if the inputs cannot be deserialized or the corner
    /// geometry is inconsistent
    #[wasm_bindgen(constructor)]
    pub fn new(
        corners: JsValue,
        width: u32,
        height: u32,
        options: JsValue,
    ) -> Result<JsGeoreference, JsValue> {
        let corners = parse_corners(corners)?.into_core();
        let options = parse_options(options)?;
        Georeference::new(&corners, ImageSize::new(width, height), &options)
            .map(JsGeoreference::from_core)
            .map_err(to_js_error)
    }

    /// Transform one pixel point, returning `[x, y]`.
    pub fn apply(&self, x: f64, y: f64) -> Result<Vec<f64>, JsValue> {
        let out = self.apply_core(x, y).map_err(to_js_error)?;
        forward_warnings(&out.warnings);
        Ok(vec![out.point.x, out.point.y])
    }

    /// Transform a flat `[x0, y0, x1, y1, ...]` buffer of pixel points.
    pub fn apply_points(&self, points: Vec<f64>) -> Result<Vec<f64>, JsValue> {
        let out = self.apply_points_core(&points).map_err(to_js_error)?;
        for t in &out {
            forward_warnings(&t.warnings);
        }
        Ok(points_to_flat(&out))
    }

    /// All intermediate stages for one point, as a plain object.
    pub fn stages(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let trace = self.stages_core(x, y).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&trace).map_err(to_js_error)
    }

    /// Bounds warnings for a point, as an array of messages.
    pub fn bounds_warnings(&self, x: f64, y: f64) -> js_sys::Array {
        self.bounds_messages(x, y)
            .iter()
            .map(|m| JsValue::from_str(m))
            .collect()
    }

    /// Applied rotation angle in radians (undefined in axis-aligned mode).
    #[wasm_bindgen(getter)]
    pub fn rotation_angle(&self) -> Option<f64> {
        self.inner.rotation().map(|r| r.angle)
    }

    /// Angle inferred from the top edge (undefined in axis-aligned mode).
    #[wasm_bindgen(getter)]
    pub fn angle_x(&self) -> Option<f64> {
        self.inner.rotation().map(|r| r.angle_x)
    }

    /// Angle inferred from the left edge (undefined in axis-aligned mode).
    #[wasm_bindgen(getter)]
    pub fn angle_y(&self) -> Option<f64> {
        self.inner.rotation().map(|r| r.angle_y)
    }

    /// `"x"` or `"y"`: which edge supplied the rotation.
    #[wasm_bindgen(getter)]
    pub fn dominant_axis(&self) -> Option<String> {
        self.dominant_axis_name().map(str::to_string)
    }

    /// Geographic units per pixel along x.
    #[wasm_bindgen(getter)]
    pub fn scale_x(&self) -> f64 {
        self.inner.scale_factor().x
    }

    /// Geographic units per pixel along y.
    #[wasm_bindgen(getter)]
    pub fn scale_y(&self) -> f64 {
        self.inner.scale_factor().y
    }
}

impl JsGeoreference {
    pub(crate) fn from_core(inner: Georeference) -> Self {
        Self { inner }
    }

    fn apply_core(&self, x: f64, y: f64) -> Result<Transformed, String> {
        self.inner
            .apply(PixelPoint::new(x, y))
            .map_err(|e| e.to_string())
    }

    fn apply_points_core(&self, flat: &[f64]) -> Result<Vec<Transformed>, String> {
        let points = pairs_to_points(flat)?;
        self.inner.apply_points(&points).map_err(|e| e.to_string())
    }

    fn stages_core(&self, x: f64, y: f64) -> Result<StageTrace, String> {
        self.inner
            .trace(PixelPoint::new(x, y))
            .map_err(|e| e.to_string())
    }

    fn bounds_messages(&self, x: f64, y: f64) -> Vec<String> {
        georef_core::transform::check_bounds(PixelPoint::new(x, y), self.inner.imagesize())
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn dominant_axis_name(&self) -> Option<&'static str> {
        self.inner.rotation().map(|r| match r.axis {
            DominantAxis::X => "x",
            DominantAxis::Y => "y",
        })
    }
}

/// Transform a single pixel point with default options.
///
/// Returns `{point: {x, y}, warnings: [...]}`. Warnings are also written to
/// the browser console.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const { point } = transform(150, 50, corners, 100, 100);
/// ```
#[wasm_bindgen]
pub fn transform(
    x: f64,
    y: f64,
    corners: JsValue,
    width: u32,
    height: u32,
) -> Result<JsValue, JsValue> {
    let corners = parse_corners(corners)?.into_core();
    let out = georef_core::transform(PixelPoint::new(x, y), &corners, ImageSize::new(width, height))
        .map_err(to_js_error)?;
    forward_warnings(&out.warnings);
    serde_wasm_bindgen::to_value(&out).map_err(to_js_error)
}


/// WASM-specific tests that require JsValue.
///
/// These tests go through the `JsValue` constructors and can only run on
/// wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Serialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct TestCorners {
        upper_right: [f64; 2],
        upper_left: [f64; 2],
        lower_left: [f64; 2],
    }

    fn corners_value(upper_right: [f64; 2]) -> JsValue {
        let corners = TestCorners {
            upper_right,
            upper_left: [0.0, 10.0],
            lower_left: [0.0, 0.0],
        };
        serde_wasm_bindgen::to_value(&corners).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_constructor_with_default_options() {
        let georef = JsGeoreference::new(corners_value([10.0, 10.0]), 100, 100, JsValue::UNDEFINED)
            .expect("valid corners");
        let point = georef.apply(100.0, 0.0).unwrap();
        assert!((point[0] - 10.0).abs() < 1e-9);
        assert!((point[1] - 10.0).abs() < 1e-9);
    }

    #[wasm_bindgen_test]
    fn test_constructor_rejects_inconsistent_scale() {
        let result = JsGeoreference::new(corners_value([40.0, 10.0]), 10, 10, JsValue::UNDEFINED);
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_constructor_rejects_malformed_corners() {
        let result = JsGeoreference::new(JsValue::from_str("nope"), 10, 10, JsValue::NULL);
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_out_of_bounds_still_returns_point() {
        let value = transform(150.0, 50.0, corners_value([10.0, 10.0]), 100, 100).unwrap();
        assert!(value.is_object());
    }

    #[wasm_bindgen_test]
    fn test_bounds_warnings_array() {
        let georef = JsGeoreference::new(corners_value([10.0, 10.0]), 100, 100, JsValue::UNDEFINED)
            .unwrap();
        assert_eq!(georef.bounds_warnings(150.0, 50.0).length(), 1);
    }
}
