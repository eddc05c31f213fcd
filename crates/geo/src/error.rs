//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Radius missing, non-positive or non-finite
    #[error("Invalid radius: {0}")]
    InvalidRadius(String),
}

/// Error code for integration with marketlist-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10001,
    /// Invalid radius
    InvalidRadius = 10002,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidRadius(_) => GeoErrorCode::InvalidRadius,
        }
    }
}

/// Checks that a search radius is present, finite and strictly positive.
///
/// # Example
/// ```
/// use marketlist_geo::validate_radius;
///
/// assert_eq!(validate_radius(Some(5.0)), Ok(5.0));
/// assert!(validate_radius(Some(0.0)).is_err());
/// assert!(validate_radius(None).is_err());
/// ```
pub fn validate_radius(radius_miles: Option<f64>) -> Result<f64> {
    match radius_miles {
        None => Err(GeoError::InvalidRadius("missing".into())),
        Some(r) if r.is_finite() && r > 0.0 => Ok(r),
        Some(r) => Err(GeoError::InvalidRadius(format!("{r} miles"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_validation() {
        assert_eq!(validate_radius(Some(0.25)), Ok(0.25));
        assert!(validate_radius(Some(-1.0)).is_err());
        assert!(validate_radius(Some(f64::INFINITY)).is_err());
        assert!(validate_radius(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_error_codes() {
        let err = validate_radius(None).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidRadius);
        assert_eq!(err.code() as u32, 10002);
        assert_eq!(err.to_string(), "Invalid radius: missing");
    }
}
