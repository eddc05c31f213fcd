//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's radius in statute miles used for all list distances.
///
/// Golden outputs depend on this exact value, so it is not the IUGG mean.
pub const EARTH_RADIUS_MILES: f64 = 3956.0;

/// Calculates the great-circle distance between two coordinates in miles.
///
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)`, `d = 2·asin(√a)·R`.
///
/// # Example
/// ```
/// use marketlist_geo::{haversine_miles, Coordinate};
///
/// let p1 = Coordinate::new(42.3, -71.1);
/// let p2 = Coordinate::new(42.5, -71.1);
///
/// let distance = haversine_miles(&p1, &p2);
/// assert!((distance - 13.81).abs() < 0.01);
/// ```
#[inline]
pub fn haversine_miles(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    c * EARTH_RADIUS_MILES
}
