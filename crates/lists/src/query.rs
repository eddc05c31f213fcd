//! Property listing filters and pagination.

use crate::model::Property;
use serde::{Deserialize, Serialize};

/// Optional filters for browsing properties. Blank text filters are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyQuery {
    /// Substring of the street address
    pub search: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    /// Inclusive lower bound on assessed value
    pub min_value: Option<i64>,
    /// Inclusive upper bound on assessed value
    pub max_value: Option<i64>,
}

impl PropertyQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn zip_code(mut self, zip: impl Into<String>) -> Self {
        self.zip_code = Some(zip.into());
        self
    }

    pub fn value_between(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Returns true if the property passes every filter that is set.
    pub fn matches(&self, property: &Property) -> bool {
        contains_ci(&property.address, self.search.as_deref())
            && contains_ci(&property.city, self.city.as_deref())
            && contains_ci(&property.zip_code, self.zip_code.as_deref())
            && self.min_value.map_or(true, |min| property.assessed_value >= min)
            && self.max_value.map_or(true, |max| property.assessed_value <= max)
    }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(n) if !n.is_empty() => haystack.to_lowercase().contains(&n.to_lowercase()),
        _ => true,
    }
}

/// One page of a longer result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served
    pub number: usize,
    pub num_pages: usize,
    /// Item count across all pages
    pub total: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Slices `items` into the requested page.
///
/// Page 0 is treated as page 1 and pages past the end serve the last page.
/// An empty input still has one (empty) page.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let num_pages = total.div_ceil(per_page).max(1);
    let number = page.clamp(1, num_pages);

    let items = items
        .into_iter()
        .skip((number - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        number,
        num_pages,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OwnerId, PropertyId};

    fn property(id: u64, address: &str, city: &str, zip: &str, value: i64) -> Property {
        Property {
            id: PropertyId(id),
            owner: OwnerId(1),
            address: address.into(),
            city: city.into(),
            zip_code: zip.into(),
            latitude: 42.3,
            longitude: -71.1,
            assessed_value: value,
            style: String::new(),
            year_built: None,
        }
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let p = property(1, "12 Elm St", "Cambridge", "02139", 500_000);
        assert!(PropertyQuery::new().matches(&p));
        assert!(PropertyQuery::new().search("").matches(&p));
    }

    #[test]
    fn test_text_filters_are_case_insensitive() {
        let p = property(1, "12 Elm St", "Cambridge", "02139", 500_000);
        assert!(PropertyQuery::new().search("elm").matches(&p));
        assert!(PropertyQuery::new().city("CAMB").matches(&p));
        assert!(PropertyQuery::new().zip_code("021").matches(&p));
        assert!(!PropertyQuery::new().city("Boston").matches(&p));
    }

    #[test]
    fn test_value_bounds_are_inclusive() {
        let p = property(1, "12 Elm St", "Cambridge", "02139", 500_000);
        assert!(PropertyQuery::new().value_between(Some(500_000), Some(500_000)).matches(&p));
        assert!(!PropertyQuery::new().value_between(Some(500_001), None).matches(&p));
        assert!(!PropertyQuery::new().value_between(None, Some(499_999)).matches(&p));
    }

    #[test]
    fn test_paginate_clamps_pages() {
        let items: Vec<u32> = (1..=120).collect();

        let first = paginate(items.clone(), 0, 50);
        assert_eq!(first.number, 1);
        assert_eq!(first.items.len(), 50);
        assert_eq!(first.num_pages, 3);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let last = paginate(items, 99, 50);
        assert_eq!(last.number, 3);
        assert_eq!(last.items, (101..=120).collect::<Vec<_>>());
        assert!(!last.has_next());
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::<u32>::new(), 4, 50);
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }
}
