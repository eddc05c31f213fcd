//! Property records and marketing lists.

use chrono::{DateTime, Utc};
use marketlist_geo::{Coordinate, Located};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a property record.
    PropertyId
);
id_type!(
    /// Identifier of a property owner.
    OwnerId
);
id_type!(
    /// Identifier of a marketing list.
    ListId
);
id_type!(
    /// Identifier of the user profile that owns a list.
    ProfileId
);

/// The person or company that owns a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyOwner {
    pub id: OwnerId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub is_company: bool,
}

impl PropertyOwner {
    /// "Company" or "Individual".
    pub fn kind_label(&self) -> &'static str {
        if self.is_company {
            "Company"
        } else {
            "Individual"
        }
    }
}

impl fmt::Display for PropertyOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind_label())
    }
}

/// An assessed property. Read-only input to the list engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub owner: OwnerId,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub assessed_value: i64,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub year_built: Option<u16>,
}

impl Located for Property {
    #[inline]
    fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.address, self.city, self.zip_code)
    }
}

/// How a list's center point is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMode {
    /// Center resolved from a street address
    AddressRadius,
    /// Center picked directly, e.g. on a map
    CoordinateRadius,
}

/// The saved spatial query of a list.
///
/// In address mode the center coordinate is derived and lives on the list,
/// not here, so it can never be edited independently of the address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FilterParams {
    AddressRadius {
        center_address: String,
        radius_miles: Option<f64>,
    },
    CoordinateRadius {
        center_lat: f64,
        center_lon: f64,
        radius_miles: Option<f64>,
    },
}

impl FilterParams {
    pub fn address(center_address: impl Into<String>, radius_miles: f64) -> Self {
        Self::AddressRadius {
            center_address: center_address.into(),
            radius_miles: Some(radius_miles),
        }
    }

    pub fn coordinate(center_lat: f64, center_lon: f64, radius_miles: f64) -> Self {
        Self::CoordinateRadius {
            center_lat,
            center_lon,
            radius_miles: Some(radius_miles),
        }
    }

    pub fn mode(&self) -> ListMode {
        match self {
            Self::AddressRadius { .. } => ListMode::AddressRadius,
            Self::CoordinateRadius { .. } => ListMode::CoordinateRadius,
        }
    }

    pub fn radius_miles(&self) -> Option<f64> {
        match self {
            Self::AddressRadius { radius_miles, .. } | Self::CoordinateRadius { radius_miles, .. } => {
                *radius_miles
            }
        }
    }

    pub fn center_address(&self) -> Option<&str> {
        match self {
            Self::AddressRadius { center_address, .. } => Some(center_address),
            Self::CoordinateRadius { .. } => None,
        }
    }

    /// The user-supplied center, present only in coordinate mode.
    pub fn supplied_center(&self) -> Option<Coordinate> {
        match self {
            Self::AddressRadius { .. } => None,
            Self::CoordinateRadius { center_lat, center_lon, .. } => {
                Some(Coordinate::new(*center_lat, *center_lon))
            }
        }
    }

    /// Returns a copy with the radius replaced.
    pub fn with_radius(mut self, radius: Option<f64>) -> Self {
        match &mut self {
            Self::AddressRadius { radius_miles, .. } | Self::CoordinateRadius { radius_miles, .. } => {
                *radius_miles = radius;
            }
        }
        self
    }
}

/// A named, saved radius search plus its materialized members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingList {
    pub id: ListId,
    pub owner: ProfileId,
    pub name: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub filter: FilterParams,
    /// Resolved center. Zero when the address could not be resolved.
    pub center: Coordinate,
    pub members: BTreeSet<PropertyId>,
}

impl MarketingList {
    pub fn mode(&self) -> ListMode {
        self.filter.mode()
    }

    pub fn center_lat(&self) -> f64 {
        self.center.latitude
    }

    pub fn center_lon(&self) -> f64 {
        self.center.longitude
    }

    pub fn radius_miles(&self) -> Option<f64> {
        self.filter.radius_miles()
    }
}

impl fmt::Display for MarketingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} properties)", self.name, self.members.len())
    }
}

/// Input for creating a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewList {
    pub owner: ProfileId,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    pub filter: FilterParams,
}

impl NewList {
    pub fn new(owner: ProfileId, name: impl Into<String>, filter: FilterParams) -> Self {
        Self {
            owner,
            name: name.into(),
            notes: String::new(),
            filter,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Partial edit of a list. `None` leaves a field as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListUpdate {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub filter: Option<FilterParams>,
}

impl ListUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn filter(mut self, filter: FilterParams) -> Self {
        self.filter = Some(filter);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_params_accessors() {
        let by_address = FilterParams::address("12 Elm St", 2.5);
        assert_eq!(by_address.mode(), ListMode::AddressRadius);
        assert_eq!(by_address.center_address(), Some("12 Elm St"));
        assert_eq!(by_address.radius_miles(), Some(2.5));
        assert!(by_address.supplied_center().is_none());

        let by_point = FilterParams::coordinate(42.3, -71.1, 10.0);
        assert_eq!(by_point.mode(), ListMode::CoordinateRadius);
        assert_eq!(by_point.supplied_center(), Some(Coordinate::new(42.3, -71.1)));
        assert_eq!(by_point.clone().with_radius(Some(15.0)).radius_miles(), Some(15.0));
        assert_ne!(by_point.clone().with_radius(Some(15.0)), by_point);
    }

    #[test]
    fn test_filter_params_serde_shape() {
        let json = serde_json::to_value(FilterParams::coordinate(42.3, -71.1, 10.0)).unwrap();
        assert_eq!(json["mode"], "coordinate_radius");
        assert_eq!(json["center_lat"], 42.3);

        let parsed: FilterParams = serde_json::from_str(
            r#"{"mode":"address_radius","center_address":"1 Main St","radius_miles":null}"#,
        )
        .unwrap();
        assert_eq!(parsed.radius_miles(), None);
    }

    #[test]
    fn test_property_display_and_location() {
        let property = Property {
            id: PropertyId(1),
            owner: OwnerId(9),
            address: "12 Elm St".into(),
            city: "Cambridge".into(),
            zip_code: "02139".into(),
            latitude: 42.3,
            longitude: -71.1,
            assessed_value: 850_000,
            style: "Colonial".into(),
            year_built: Some(1925),
        };
        assert_eq!(property.to_string(), "12 Elm St, Cambridge, 02139");
        assert_eq!(property.coordinate(), Coordinate::new(42.3, -71.1));
    }

    #[test]
    fn test_owner_label() {
        let owner = PropertyOwner {
            id: OwnerId(1),
            name: "Acme Holdings".into(),
            address: String::new(),
            is_company: true,
        };
        assert_eq!(owner.to_string(), "Acme Holdings (Company)");
    }
}
