//! Geospatial radius filtering for marketing lists.
//!
//! This crate provides:
//! - Haversine distance in statute miles (Earth radius 3956 mi)
//! - A coarse degree-based bounding-box prefilter
//! - Exact radius filtering with optional parallelism
//!
//! # Example
//!
//! ```
//! use marketlist_geo::{haversine_miles, Coordinate};
//!
//! let cambridge = Coordinate::new(42.3736, -71.1097);
//! let worcester = Coordinate::new(42.2626, -71.8023);
//!
//! let miles = haversine_miles(&cambridge, &worcester);
//! assert!((miles - 35.0).abs() < 2.0);
//! ```

mod bbox;
mod error;
mod haversine;
pub mod radius;

pub use bbox::{prefilter, BoundingBox, MILES_PER_DEGREE_LAT, MILES_PER_DEGREE_LON};
pub use error::{validate_radius, GeoError, GeoErrorCode, Result};
pub use haversine::{haversine_miles, EARTH_RADIUS_MILES};
pub use radius::{filter_by_radius, within_radius};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// The zero coordinate stored on lists whose address could not be resolved.
    pub const ORIGIN: Coordinate = Coordinate { latitude: 0.0, longitude: 0.0 };

    /// Creates a new coordinate without validation.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!("({latitude}, {longitude})")))
        }
    }

    /// Returns true if the coordinate has valid values.
    ///
    /// NaN fails every comparison, so non-finite input is rejected here too.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

/// Anything that sits at a single point on the map.
///
/// Implemented by property records so the filters can work on them directly
/// without copying coordinates out first.
pub trait Located {
    /// The point this item is located at.
    fn coordinate(&self) -> Coordinate;
}

impl Located for Coordinate {
    #[inline]
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

impl<T: Located + ?Sized> Located for &T {
    #[inline]
    fn coordinate(&self) -> Coordinate {
        (**self).coordinate()
    }
}
