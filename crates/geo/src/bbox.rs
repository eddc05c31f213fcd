//! Degree-based bounding-box prefilter.
//!
//! The box uses fixed miles-per-degree factors and is not corrected for the
//! cosine of the latitude. It only has to over-include: the exact radius
//! filter decides final membership.

use crate::{Coordinate, Located};

/// Approximate miles per degree of latitude.
pub const MILES_PER_DEGREE_LAT: f64 = 69.0;

/// Approximate miles per degree of longitude (fixed, latitude independent).
///
/// Below roughly 69·cos(lat) = 50, i.e. north of ~43.6°, a degree of
/// longitude is shorter than this and the box can under-include at its
/// east/west edges. Kept as is so results match existing lists.
pub const MILES_PER_DEGREE_LON: f64 = 50.0;

/// An axis-aligned latitude/longitude rectangle, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Builds the prefilter box around `center`.
    ///
    /// Returns `None` when the radius cannot match anything (zero, negative
    /// or non-finite).
    pub fn around(center: &Coordinate, radius_miles: f64) -> Option<Self> {
        if !(radius_miles.is_finite() && radius_miles > 0.0) {
            return None;
        }

        let lat_delta = radius_miles / MILES_PER_DEGREE_LAT;
        let lon_delta = radius_miles / MILES_PER_DEGREE_LON;

        Some(Self {
            min_lat: center.latitude - lat_delta,
            max_lat: center.latitude + lat_delta,
            min_lon: center.longitude - lon_delta,
            max_lon: center.longitude + lon_delta,
        })
    }

    /// Returns true if the point lies inside or on the edge of the box.
    #[inline]
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }
}

/// Narrows `candidates` to those inside the bounding box of the radius.
///
/// The result keeps input order. A non-positive radius yields nothing.
pub fn prefilter<'a, T: Located>(
    center: &Coordinate,
    radius_miles: f64,
    candidates: &'a [T],
) -> Vec<&'a T> {
    let Some(bounds) = BoundingBox::around(center, radius_miles) else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter(|item| bounds.contains(&item.coordinate()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_dimensions() {
        let bounds = BoundingBox::around(&Coordinate::new(42.0, -71.0), 69.0).unwrap();
        assert!((bounds.min_lat - 41.0).abs() < 1e-12);
        assert!((bounds.max_lat - 43.0).abs() < 1e-12);
        assert!((bounds.min_lon - (-72.38)).abs() < 1e-12);
        assert!((bounds.max_lon - (-69.62)).abs() < 1e-12);
    }

    #[test]
    fn test_edges_are_inclusive() {
        let center = Coordinate::new(0.0, 0.0);
        let bounds = BoundingBox::around(&center, 50.0).unwrap();
        assert!(bounds.contains(&Coordinate::new(0.0, 1.0)));
        assert!(bounds.contains(&Coordinate::new(0.0, -1.0)));
        assert!(!bounds.contains(&Coordinate::new(0.0, 1.0001)));
    }

    #[test]
    fn test_non_positive_radius_is_empty() {
        let center = Coordinate::new(42.3, -71.1);
        let points = vec![center];
        assert!(prefilter(&center, 0.0, &points).is_empty());
        assert!(prefilter(&center, -3.0, &points).is_empty());
        assert!(prefilter(&center, f64::NAN, &points).is_empty());
        assert!(BoundingBox::around(&center, 0.0).is_none());
    }

    #[test]
    fn test_prefilter_keeps_order() {
        let center = Coordinate::new(42.3, -71.1);
        let points = vec![
            Coordinate::new(42.31, -71.1),
            Coordinate::new(45.0, -71.1),
            Coordinate::new(42.29, -71.09),
        ];
        let hits = prefilter(&center, 5.0, &points);
        assert_eq!(hits, vec![&points[0], &points[2]]);
    }
}
