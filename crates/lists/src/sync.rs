//! Keeps a list's members equal to the result of its saved radius search.
//!
//! A synchronization runs four stages: resolve the center, validate the
//! radius, compute the qualifying set, reconcile the stored members. Bad
//! input at the first two stages degrades the list to an empty membership
//! instead of failing; only storage errors come back as `Err`.

use crate::model::{FilterParams, MarketingList, Property, PropertyId};
use crate::resolver::PointResolver;
use crate::store::{ListRepository, PropertyRepository};
use marketlist_core::Result;
use marketlist_geo::{
    filter_by_radius, haversine_miles, prefilter, validate_radius, Coordinate, Located,
};
use marketlist_telemetry::{metrics, Timer};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Why a list ended up with no members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedReason {
    /// No stored property address contains the center address
    UnresolvedAddress,
    /// Radius missing, zero, negative or not finite
    InvalidRadius,
    /// Supplied center outside ±90/±180 or not finite
    InvalidCenter,
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnresolvedAddress => "center address did not match any property",
            Self::InvalidRadius => "radius must be a positive number of miles",
            Self::InvalidCenter => "center coordinate is out of range",
        };
        f.write_str(text)
    }
}

/// A property inside the search radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub property: Property,
    pub distance_miles: f64,
}

/// Result of running a filter against the current property collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    Matched {
        center: Coordinate,
        radius_miles: f64,
        /// Closest first, ties by property id
        matches: Vec<Match>,
    },
    Degraded {
        center: Coordinate,
        reason: DegradedReason,
    },
}

impl Evaluation {
    /// The center to store on the list.
    pub fn center(&self) -> Coordinate {
        match self {
            Self::Matched { center, .. } | Self::Degraded { center, .. } => *center,
        }
    }

    /// The member set this evaluation calls for.
    pub fn member_ids(&self) -> BTreeSet<PropertyId> {
        match self {
            Self::Matched { matches, .. } => matches.iter().map(|m| m.property.id).collect(),
            Self::Degraded { .. } => BTreeSet::new(),
        }
    }
}

/// Membership difference applied by a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipChange {
    pub added: BTreeSet<PropertyId>,
    pub removed: BTreeSet<PropertyId>,
    /// Member count afterwards
    pub total: usize,
}

impl MembershipChange {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// How a synchronization ended. Both variants leave the list valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Reconciled(MembershipChange),
    Degraded {
        reason: DegradedReason,
        /// Members removed by the degrade
        cleared: usize,
    },
}

impl SyncOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

pub struct Synchronizer<'a, P: ?Sized, L: ?Sized> {
    properties: &'a P,
    lists: &'a L,
    case_sensitive: bool,
}

impl<'a, P, L> Synchronizer<'a, P, L>
where
    P: PropertyRepository + ?Sized,
    L: ListRepository + ?Sized,
{
    pub fn new(properties: &'a P, lists: &'a L) -> Self {
        Self {
            properties,
            lists,
            case_sensitive: false,
        }
    }

    /// Match center addresses case-sensitively.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Runs the resolve, validate and compute stages without writing anything.
    pub fn evaluate(&self, filter: &FilterParams) -> Result<Evaluation> {
        let center = match filter {
            FilterParams::AddressRadius { center_address, .. } => {
                let resolver = PointResolver::new(self.properties).case_sensitive(self.case_sensitive);
                match resolver.resolve(center_address)? {
                    Some(center) => center,
                    None => {
                        return Ok(Evaluation::Degraded {
                            center: Coordinate::ORIGIN,
                            reason: DegradedReason::UnresolvedAddress,
                        })
                    }
                }
            }
            FilterParams::CoordinateRadius { center_lat, center_lon, .. } => {
                match Coordinate::try_new(*center_lat, *center_lon) {
                    Ok(center) => center,
                    Err(e) => {
                        debug!(error = %e, "Rejected supplied center");
                        return Ok(Evaluation::Degraded {
                            center: Coordinate::new(*center_lat, *center_lon),
                            reason: DegradedReason::InvalidCenter,
                        });
                    }
                }
            }
        };

        let radius_miles = match validate_radius(filter.radius_miles()) {
            Ok(radius) => radius,
            Err(e) => {
                debug!(error = %e, "Rejected radius");
                return Ok(Evaluation::Degraded {
                    center,
                    reason: DegradedReason::InvalidRadius,
                });
            }
        };

        let all = self.properties.find_all()?;
        let candidates = prefilter(&center, radius_miles, &all);
        let hits = filter_by_radius(&center, radius_miles, &candidates);
        debug!(
            total = all.len(),
            candidates = candidates.len(),
            hits = hits.len(),
            radius_miles,
            "Radius search"
        );

        let mut matches: Vec<Match> = hits
            .into_iter()
            .map(|property| Match {
                distance_miles: haversine_miles(&center, &property.coordinate()),
                property: property.clone(),
            })
            .collect();
        matches.sort_by(|a, b| {
            a.distance_miles
                .total_cmp(&b.distance_miles)
                .then(a.property.id.cmp(&b.property.id))
        });

        Ok(Evaluation::Matched {
            center,
            radius_miles,
            matches,
        })
    }

    /// Recomputes the list's members from its filter and stores the result.
    ///
    /// The filter, center and members are committed in one repository call,
    /// and `list` is updated in place only once that succeeds. Running it
    /// twice with the same filter and properties changes nothing the second
    /// time.
    #[instrument(skip_all, fields(list_id = %list.id, mode = ?list.mode()))]
    pub fn synchronize(&self, list: &mut MarketingList) -> Result<SyncOutcome> {
        let _timer = Timer::start("lists.sync_ms");

        let evaluation = self.evaluate(&list.filter)?;
        let target = evaluation.member_ids();
        let current = self.lists.members(list.id)?;

        let updated = MarketingList {
            center: evaluation.center(),
            members: target.clone(),
            ..list.clone()
        };
        self.lists.save_with_members(&updated, &target)?;

        let outcome = match evaluation {
            Evaluation::Matched { .. } => {
                let change = MembershipChange {
                    added: target.difference(&current).copied().collect(),
                    removed: current.difference(&target).copied().collect(),
                    total: target.len(),
                };
                info!(
                    added = change.added.len(),
                    removed = change.removed.len(),
                    total = change.total,
                    "List reconciled"
                );
                metrics().increment("lists.synchronized");
                SyncOutcome::Reconciled(change)
            }
            Evaluation::Degraded { reason, .. } => {
                warn!(%reason, cleared = current.len(), "List degraded to empty membership");
                metrics().increment("lists.degraded");
                SyncOutcome::Degraded {
                    reason,
                    cleared: current.len(),
                }
            }
        };

        metrics().histogram("lists.members", target.len() as f64);
        *list = updated;
        Ok(outcome)
    }
}
