//! Translation of a rotated point onto the lower-left anchor corner.

use crate::types::GeoPoint;

/// Offset `point` by the geographic position of the lower-left corner.
#[inline]
pub fn translate(point: GeoPoint, lower_left: GeoPoint) -> GeoPoint {
    point.add(lower_left)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_origin_lands_on_anchor() {
        let ll = GeoPoint::new(358.84, -0.62);
        assert_eq!(translate(GeoPoint::new(0.0, 0.0), ll), ll);
    }

    #[test]
    fn test_translate_adds() {
        let out = translate(GeoPoint::new(1.5, -2.0), GeoPoint::new(10.0, 20.0));
        assert_eq!(out, GeoPoint::new(11.5, 18.0));
    }
}
