//! In-memory store implementing both repositories.
//!
//! Each collection sits behind its own `RwLock`. Saving a list together with
//! its members happens under a single write lock, which is this store's
//! transaction unit.

use crate::model::{
    ListId, MarketingList, NewList, OwnerId, ProfileId, Property, PropertyId, PropertyOwner,
};
use crate::store::{ListRepository, PropertyRepository};
use chrono::Utc;
use marketlist_core::{Error, Result, ResultExt};
use marketlist_geo::Coordinate;
use marketlist_telemetry::metrics;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Owners and properties as produced by the data import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertySnapshot {
    #[serde(default)]
    pub owners: Vec<PropertyOwner>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    owners: RwLock<BTreeMap<OwnerId, PropertyOwner>>,
    properties: RwLock<BTreeMap<PropertyId, Property>>,
    lists: RwLock<BTreeMap<ListId, MarketingList>>,
    next_list_id: AtomicU64,
}

fn read<'a, T>(lock: &'a RwLock<T>, what: &str) -> Result<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| Error::lock_poisoned(what))
}

fn write<'a, T>(lock: &'a RwLock<T>, what: &str) -> Result<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| Error::lock_poisoned(what))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: PropertySnapshot) -> Self {
        let store = Self::new();
        // Fresh locks cannot be poisoned.
        if let (Ok(mut owners), Ok(mut properties)) = (store.owners.write(), store.properties.write()) {
            owners.extend(snapshot.owners.into_iter().map(|o| (o.id, o)));
            properties.extend(snapshot.properties.into_iter().map(|p| (p.id, p)));
        }
        store
    }

    /// Loads a JSON [`PropertySnapshot`] from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(Error::from)
            .context(format!("While reading property snapshot {}", path.display()))?;
        let snapshot: PropertySnapshot = serde_json::from_str(&content)
            .map_err(Error::from)
            .context(format!("While parsing property snapshot {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            owners = snapshot.owners.len(),
            properties = snapshot.properties.len(),
            "Loaded property snapshot"
        );
        metrics().gauge("store.properties", snapshot.properties.len() as u64);
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn insert_owner(&self, owner: PropertyOwner) -> Result<()> {
        write(&self.owners, "owners")?.insert(owner.id, owner);
        Ok(())
    }

    /// Adds or replaces a property. Existing list memberships are untouched.
    pub fn insert_property(&self, property: Property) -> Result<()> {
        write(&self.properties, "properties")?.insert(property.id, property);
        Ok(())
    }

    pub fn property_count(&self) -> Result<usize> {
        Ok(read(&self.properties, "properties")?.len())
    }

    fn with_list<R>(&self, id: ListId, f: impl FnOnce(&mut MarketingList) -> R) -> Result<R> {
        let mut lists = write(&self.lists, "lists")?;
        let list = lists
            .get_mut(&id)
            .ok_or_else(|| Error::list_not_found(id.0))?;
        Ok(f(list))
    }
}

impl PropertyRepository for MemoryStore {
    fn find_all(&self) -> Result<Vec<Property>> {
        Ok(read(&self.properties, "properties")?.values().cloned().collect())
    }

    fn find_by_address_substring(&self, text: &str, case_sensitive: bool) -> Result<Vec<Property>> {
        let properties = read(&self.properties, "properties")?;
        let matches = if case_sensitive {
            properties
                .values()
                .filter(|p| p.address.contains(text))
                .cloned()
                .collect()
        } else {
            let needle = text.to_lowercase();
            properties
                .values()
                .filter(|p| p.address.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        };
        Ok(matches)
    }

    fn get_property(&self, id: PropertyId) -> Result<Option<Property>> {
        Ok(read(&self.properties, "properties")?.get(&id).cloned())
    }

    fn get_owner(&self, id: OwnerId) -> Result<Option<PropertyOwner>> {
        Ok(read(&self.owners, "owners")?.get(&id).cloned())
    }

    fn get_properties(&self, ids: &BTreeSet<PropertyId>) -> Result<Vec<Property>> {
        let properties = read(&self.properties, "properties")?;
        Ok(ids.iter().filter_map(|id| properties.get(id).cloned()).collect())
    }
}

impl ListRepository for MemoryStore {
    fn insert(&self, new: NewList) -> Result<MarketingList> {
        let id = ListId(self.next_list_id.fetch_add(1, Ordering::Relaxed) + 1);
        let center = new.filter.supplied_center().unwrap_or(Coordinate::ORIGIN);
        let list = MarketingList {
            id,
            owner: new.owner,
            name: new.name,
            notes: new.notes,
            created_at: Utc::now(),
            filter: new.filter,
            center,
            members: BTreeSet::new(),
        };
        write(&self.lists, "lists")?.insert(id, list.clone());
        Ok(list)
    }

    fn get_list(&self, id: ListId) -> Result<Option<MarketingList>> {
        Ok(read(&self.lists, "lists")?.get(&id).cloned())
    }

    fn save(&self, list: &MarketingList) -> Result<()> {
        self.with_list(list.id, |stored| {
            let members = std::mem::take(&mut stored.members);
            *stored = MarketingList {
                members,
                ..list.clone()
            };
        })
    }

    fn delete(&self, id: ListId) -> Result<bool> {
        Ok(write(&self.lists, "lists")?.remove(&id).is_some())
    }

    fn find_by_owner(&self, owner: ProfileId) -> Result<Vec<MarketingList>> {
        Ok(read(&self.lists, "lists")?
            .values()
            .filter(|l| l.owner == owner)
            .cloned()
            .collect())
    }

    fn members(&self, id: ListId) -> Result<BTreeSet<PropertyId>> {
        read(&self.lists, "lists")?
            .get(&id)
            .map(|l| l.members.clone())
            .ok_or_else(|| Error::list_not_found(id.0))
    }

    fn add_member(&self, id: ListId, property: PropertyId) -> Result<bool> {
        self.with_list(id, |list| list.members.insert(property))
    }

    fn remove_member(&self, id: ListId, property: PropertyId) -> Result<bool> {
        self.with_list(id, |list| list.members.remove(&property))
    }

    fn clear_members(&self, id: ListId) -> Result<()> {
        self.with_list(id, |list| list.members.clear())
    }

    fn replace_members(&self, id: ListId, members: &BTreeSet<PropertyId>) -> Result<()> {
        self.with_list(id, |list| list.members.clone_from(members))
    }

    fn save_with_members(&self, list: &MarketingList, members: &BTreeSet<PropertyId>) -> Result<()> {
        self.with_list(list.id, |stored| {
            *stored = MarketingList {
                members: members.clone(),
                ..list.clone()
            };
        })
    }
}
