//! Address to coordinate resolution against stored property addresses.
//!
//! There is no geocoder behind this: the first stored property whose address
//! contains the text (lowest id wins) supplies the point. Ambiguous or wrong
//! matches are not detected, and callers rely on exactly that behaviour.

use crate::store::PropertyRepository;
use marketlist_core::Result;
use marketlist_geo::{Coordinate, Located};
use tracing::debug;

pub struct PointResolver<'a, P: ?Sized> {
    properties: &'a P,
    case_sensitive: bool,
}

impl<'a, P: PropertyRepository + ?Sized> PointResolver<'a, P> {
    /// Case-insensitive resolver.
    pub fn new(properties: &'a P) -> Self {
        Self {
            properties,
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Resolves `address` to the coordinate of the first matching property.
    ///
    /// `Ok(None)` means nothing matched, including for blank input. Only
    /// storage failures are errors.
    pub fn resolve(&self, address: &str) -> Result<Option<Coordinate>> {
        if address.trim().is_empty() {
            debug!("Blank center address, nothing to resolve");
            return Ok(None);
        }

        let hit = self
            .properties
            .find_by_address_substring(address, self.case_sensitive)?
            .into_iter()
            .min_by_key(|p| p.id);

        match hit {
            Some(property) => {
                debug!(address, property_id = %property.id, "Resolved center address");
                Ok(Some(property.coordinate()))
            }
            None => {
                debug!(address, "No property address matched");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::model::{OwnerId, Property, PropertyId};

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        for (id, address, lat) in [
            (5, "123 Main St", 42.5),
            (3, "123 Main Street Unit 2", 42.3),
            (9, "77 Harbor Rd", 41.9),
        ] {
            store
                .insert_property(Property {
                    id: PropertyId(id),
                    owner: OwnerId(1),
                    address: address.into(),
                    city: "Salem".into(),
                    zip_code: "01970".into(),
                    latitude: lat,
                    longitude: -70.9,
                    assessed_value: 300_000,
                    style: String::new(),
                    year_built: None,
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_first_match_by_lowest_id() {
        let store = store();
        let coord = PointResolver::new(&store).resolve("123 main").unwrap();
        assert_eq!(coord, Some(Coordinate::new(42.3, -70.9)));
    }

    #[test]
    fn test_case_sensitive_mode() {
        let store = store();
        let resolver = PointResolver::new(&store).case_sensitive(true);
        assert_eq!(resolver.resolve("123 main").unwrap(), None);
        assert!(resolver.resolve("Harbor").unwrap().is_some());
    }

    #[test]
    fn test_not_found_is_not_an_error() {
        let store = store();
        let resolver = PointResolver::new(&store);
        assert_eq!(resolver.resolve("Nonexistent Road").unwrap(), None);
        assert_eq!(resolver.resolve("").unwrap(), None);
        assert_eq!(resolver.resolve("   ").unwrap(), None);
        assert_eq!(resolver.resolve("%$#@!").unwrap(), None);
    }
}
