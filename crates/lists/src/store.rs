//! Repository traits the list engine reads and writes through.
//!
//! Errors from these traits are storage failures. The engine never swallows
//! them: they propagate to the caller unchanged.

use crate::model::{ListId, MarketingList, NewList, OwnerId, ProfileId, Property, PropertyId, PropertyOwner};
use crate::query::PropertyQuery;
use marketlist_core::{Error, Result};
use std::collections::BTreeSet;
use tracing::warn;

/// Read access to property records.
pub trait PropertyRepository {
    /// Every property, in ascending id order.
    fn find_all(&self) -> Result<Vec<Property>>;

    /// Properties whose address contains `text`, in ascending id order.
    fn find_by_address_substring(&self, text: &str, case_sensitive: bool) -> Result<Vec<Property>>;

    fn get_property(&self, id: PropertyId) -> Result<Option<Property>>;

    fn get_owner(&self, id: OwnerId) -> Result<Option<PropertyOwner>>;

    /// Properties with the given ids, ascending; unknown ids are skipped.
    fn get_properties(&self, ids: &BTreeSet<PropertyId>) -> Result<Vec<Property>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(property) = self.get_property(*id)? {
                found.push(property);
            }
        }
        Ok(found)
    }

    /// Properties passing `query`, in ascending id order.
    fn search(&self, query: &PropertyQuery) -> Result<Vec<Property>> {
        Ok(self.find_all()?.into_iter().filter(|p| query.matches(p)).collect())
    }
}

/// Persistence for marketing lists and their many-to-many membership.
pub trait ListRepository {
    /// Stores a new list with no members and returns it with its id.
    ///
    /// The initial center is the supplied one in coordinate mode and the
    /// origin in address mode.
    fn insert(&self, new: NewList) -> Result<MarketingList>;

    fn get_list(&self, id: ListId) -> Result<Option<MarketingList>>;

    /// Writes every field except `members`. Fails if the list is gone.
    fn save(&self, list: &MarketingList) -> Result<()>;

    /// Removes the list and its membership links. Returns false if absent.
    fn delete(&self, id: ListId) -> Result<bool>;

    fn find_by_owner(&self, owner: ProfileId) -> Result<Vec<MarketingList>>;

    fn members(&self, id: ListId) -> Result<BTreeSet<PropertyId>>;

    fn add_member(&self, id: ListId, property: PropertyId) -> Result<bool>;

    fn remove_member(&self, id: ListId, property: PropertyId) -> Result<bool>;

    fn clear_members(&self, id: ListId) -> Result<()>;

    /// Makes the member set exactly `members`.
    ///
    /// Stores that support transactions should override this so readers
    /// never see a half-replaced set; the default clears then re-adds.
    fn replace_members(&self, id: ListId, members: &BTreeSet<PropertyId>) -> Result<()> {
        self.clear_members(id)?;
        for property in members {
            self.add_member(id, *property)?;
        }
        Ok(())
    }

    /// Writes the list's fields and makes its member set exactly `members`,
    /// as one change: on error the stored list keeps its previous fields
    /// and members.
    ///
    /// The default saves, replaces, and on a failed replace restores the
    /// previous record. Transactional stores should override it.
    fn save_with_members(&self, list: &MarketingList, members: &BTreeSet<PropertyId>) -> Result<()> {
        let previous = self
            .get_list(list.id)?
            .ok_or_else(|| Error::list_not_found(list.id.0))?;
        self.save(list)?;

        if let Err(err) = self.replace_members(list.id, members) {
            let restored = self
                .save(&previous)
                .and_then(|()| self.replace_members(list.id, &previous.members));
            if let Err(restore_err) = restored {
                warn!(list_id = %list.id, error = %restore_err, "Could not restore list after failed member update");
            }
            return Err(err);
        }
        Ok(())
    }
}

macro_rules! forward_property_repository {
    ($($ty:ty),*) => {$(
        impl<T: PropertyRepository + ?Sized> PropertyRepository for $ty {
            fn find_all(&self) -> Result<Vec<Property>> {
                (**self).find_all()
            }
            fn find_by_address_substring(&self, text: &str, case_sensitive: bool) -> Result<Vec<Property>> {
                (**self).find_by_address_substring(text, case_sensitive)
            }
            fn get_property(&self, id: PropertyId) -> Result<Option<Property>> {
                (**self).get_property(id)
            }
            fn get_owner(&self, id: OwnerId) -> Result<Option<PropertyOwner>> {
                (**self).get_owner(id)
            }
            fn get_properties(&self, ids: &BTreeSet<PropertyId>) -> Result<Vec<Property>> {
                (**self).get_properties(ids)
            }
            fn search(&self, query: &PropertyQuery) -> Result<Vec<Property>> {
                (**self).search(query)
            }
        }
    )*};
}

macro_rules! forward_list_repository {
    ($($ty:ty),*) => {$(
        impl<T: ListRepository + ?Sized> ListRepository for $ty {
            fn insert(&self, new: NewList) -> Result<MarketingList> {
                (**self).insert(new)
            }
            fn get_list(&self, id: ListId) -> Result<Option<MarketingList>> {
                (**self).get_list(id)
            }
            fn save(&self, list: &MarketingList) -> Result<()> {
                (**self).save(list)
            }
            fn delete(&self, id: ListId) -> Result<bool> {
                (**self).delete(id)
            }
            fn find_by_owner(&self, owner: ProfileId) -> Result<Vec<MarketingList>> {
                (**self).find_by_owner(owner)
            }
            fn members(&self, id: ListId) -> Result<BTreeSet<PropertyId>> {
                (**self).members(id)
            }
            fn add_member(&self, id: ListId, property: PropertyId) -> Result<bool> {
                (**self).add_member(id, property)
            }
            fn remove_member(&self, id: ListId, property: PropertyId) -> Result<bool> {
                (**self).remove_member(id, property)
            }
            fn clear_members(&self, id: ListId) -> Result<()> {
                (**self).clear_members(id)
            }
            fn replace_members(&self, id: ListId, members: &BTreeSet<PropertyId>) -> Result<()> {
                (**self).replace_members(id, members)
            }
            fn save_with_members(&self, list: &MarketingList, members: &BTreeSet<PropertyId>) -> Result<()> {
                (**self).save_with_members(list, members)
            }
        }
    )*};
}

forward_property_repository!(&T);
forward_list_repository!(&T);
