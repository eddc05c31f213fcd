//! Entry points used by the presentation layer.

use crate::model::{
    FilterParams, ListId, ListUpdate, MarketingList, NewList, ProfileId, Property, PropertyId,
    PropertyOwner,
};
use crate::query::{paginate, Page, PropertyQuery};
use crate::resolver::PointResolver;
use crate::store::{ListRepository, PropertyRepository};
use crate::sync::{Evaluation, SyncOutcome, Synchronizer};
use marketlist_core::config::SearchConfig;
use marketlist_core::{Error, Result, ResultExt};
use marketlist_geo::Coordinate;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// A property with its owner record, when the owner is known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDetail {
    pub property: Property,
    pub owner: Option<PropertyOwner>,
}

/// Creates, edits and reads marketing lists, keeping membership in sync.
pub struct ListService<P, L> {
    properties: P,
    lists: L,
    config: SearchConfig,
}

impl<P: PropertyRepository, L: ListRepository> ListService<P, L> {
    pub fn new(properties: P, lists: L) -> Self {
        Self::with_config(properties, lists, SearchConfig::default())
    }

    pub fn with_config(properties: P, lists: L, config: SearchConfig) -> Self {
        Self {
            properties,
            lists,
            config,
        }
    }

    fn synchronizer(&self) -> Synchronizer<'_, P, L> {
        Synchronizer::new(&self.properties, &self.lists).case_sensitive(self.config.case_sensitive_address)
    }

    /// Stores a new list and computes its members once.
    ///
    /// Unusable filters still create the list, with no members.
    #[instrument(skip_all, fields(owner = %new.owner, name = %new.name))]
    pub fn create_list(&self, new: NewList) -> Result<MarketingList> {
        if new.name.trim().is_empty() {
            return Err(Error::invalid_input("List name must not be blank"));
        }

        let mut list = self.lists.insert(new)?;
        let outcome = match self.synchronizer().synchronize(&mut list) {
            Ok(outcome) => outcome,
            Err(err) => {
                // A list is only created together with its members.
                if let Err(cleanup) = self.lists.delete(list.id) {
                    warn!(list_id = %list.id, error = %cleanup, "Could not remove list after failed create");
                }
                return Err(err).context(format!("While populating new list {}", list.id));
            }
        };
        info!(list_id = %list.id, members = list.members.len(), degraded = outcome.is_degraded(), "List created");
        Ok(list)
    }

    /// Applies an edit. Members are recomputed only when the filter changed.
    #[instrument(skip(self, update))]
    pub fn update_list(&self, id: ListId, update: ListUpdate) -> Result<MarketingList> {
        let mut list = self.require_list(id)?;

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(Error::invalid_input("List name must not be blank"));
            }
            list.name = name;
        }
        if let Some(notes) = update.notes {
            list.notes = notes;
        }

        let filter_changed = match update.filter {
            Some(filter) if filter != list.filter => {
                list.filter = filter;
                true
            }
            _ => false,
        };

        if filter_changed {
            self.synchronizer()
                .synchronize(&mut list)
                .context(format!("While re-populating list {}", id))?;
        } else {
            debug!("Filter unchanged, keeping current members");
            self.lists.save(&list)?;
            list.members = self.lists.members(id)?;
        }

        Ok(list)
    }

    /// Re-runs the saved search, e.g. after new properties were imported.
    pub fn refresh_list(&self, id: ListId) -> Result<SyncOutcome> {
        let mut list = self.require_list(id)?;
        self.synchronizer().synchronize(&mut list)
    }

    /// Deletes the list together with its membership links.
    pub fn delete_list(&self, id: ListId) -> Result<()> {
        if self.lists.delete(id)? {
            info!(list_id = %id, "List deleted");
            Ok(())
        } else {
            Err(Error::list_not_found(id.0))
        }
    }

    pub fn get_list(&self, id: ListId) -> Result<Option<MarketingList>> {
        self.lists.get_list(id)
    }

    /// The owner's lists, newest first.
    pub fn lists_for_owner(&self, owner: ProfileId) -> Result<Vec<MarketingList>> {
        let mut lists = self.lists.find_by_owner(owner)?;
        lists.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(lists)
    }

    /// One page of a list's member properties, in id order.
    pub fn list_members(&self, id: ListId, page: usize) -> Result<Page<Property>> {
        let members = self.lists.members(id)?;
        let properties = self.properties.get_properties(&members)?;
        Ok(paginate(properties, page, self.config.page_size))
    }

    /// Coordinate of the first property whose address contains `address`.
    pub fn resolve(&self, address: &str) -> Result<Option<Coordinate>> {
        PointResolver::new(&self.properties)
            .case_sensitive(self.config.case_sensitive_address)
            .resolve(address)
    }

    /// Runs a filter against current properties without storing anything.
    pub fn preview(&self, filter: &FilterParams) -> Result<Evaluation> {
        self.synchronizer().evaluate(filter)
    }

    /// One page of properties matching `query`, in id order.
    pub fn search_properties(&self, query: &PropertyQuery, page: usize) -> Result<Page<Property>> {
        let found = self.properties.search(query)?;
        Ok(paginate(found, page, self.config.page_size))
    }

    pub fn property_detail(&self, id: PropertyId) -> Result<Option<PropertyDetail>> {
        let Some(property) = self.properties.get_property(id)? else {
            return Ok(None);
        };
        let owner = self.properties.get_owner(property.owner)?;
        Ok(Some(PropertyDetail { property, owner }))
    }

    /// Sorted distinct city names, for filter dropdowns.
    pub fn distinct_cities(&self) -> Result<Vec<String>> {
        self.distinct(|p| &p.city)
    }

    /// Sorted distinct zip codes, for filter dropdowns.
    pub fn distinct_zip_codes(&self) -> Result<Vec<String>> {
        self.distinct(|p| &p.zip_code)
    }

    fn distinct(&self, field: impl Fn(&Property) -> &String) -> Result<Vec<String>> {
        let values: BTreeSet<String> = self
            .properties
            .find_all()?
            .iter()
            .map(|p| field(p).clone())
            .collect();
        Ok(values.into_iter().collect())
    }

    fn require_list(&self, id: ListId) -> Result<MarketingList> {
        self.lists.get_list(id)?.ok_or_else(|| Error::list_not_found(id.0))
    }
}
