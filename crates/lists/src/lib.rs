//! Marketing lists backed by saved radius searches.
//!
//! A list stores a center (an address resolved against known property
//! addresses, or a coordinate) and a radius in miles. Its members are always
//! the properties inside that radius as of the last time the filter was set:
//!
//! - [`resolver`] turns a center address into a coordinate
//! - [`sync`] runs the bounding-box prefilter and haversine filter, then
//!   reconciles stored membership
//! - [`service`] is what a web or CLI layer calls
//! - [`store`] defines the repositories, [`memory`] implements them in RAM
//!
//! # Example
//!
//! ```
//! use marketlist_lists::memory::MemoryStore;
//! use marketlist_lists::model::*;
//! use marketlist_lists::service::ListService;
//!
//! let store = MemoryStore::new();
//! store.insert_property(Property {
//!     id: PropertyId(1),
//!     owner: OwnerId(1),
//!     address: "12 Elm St".into(),
//!     city: "Cambridge".into(),
//!     zip_code: "02139".into(),
//!     latitude: 42.3,
//!     longitude: -71.1,
//!     assessed_value: 850_000,
//!     style: "Colonial".into(),
//!     year_built: Some(1925),
//! })?;
//!
//! let service = ListService::new(&store, &store);
//! let list = service.create_list(NewList::new(
//!     ProfileId(1),
//!     "Elm Street sellers",
//!     FilterParams::address("elm st", 2.0),
//! ))?;
//! assert_eq!(list.members.len(), 1);
//! # Ok::<(), marketlist_core::Error>(())
//! ```

pub mod memory;
pub mod model;
pub mod query;
pub mod resolver;
pub mod service;
pub mod store;
pub mod sync;

pub use memory::{MemoryStore, PropertySnapshot};
pub use model::{FilterParams, ListId, ListMode, ListUpdate, MarketingList, NewList, Property, PropertyId};
pub use query::{Page, PropertyQuery};
pub use service::ListService;
pub use store::{ListRepository, PropertyRepository};
pub use sync::{DegradedReason, Evaluation, MembershipChange, SyncOutcome, Synchronizer};
