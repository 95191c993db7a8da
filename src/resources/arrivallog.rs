//! Arrival bookkeeping resource.
//!
//! Filled by [`arrival_observer`](crate::events::arrival::arrival_observer).
//! Cleared when the owning view mounts or rebuilds its routes. Survives an
//! unmount so the totals can still be read afterwards.

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

use crate::components::geoposition::Coordinate;

#[derive(Resource, Debug, Clone, Default)]
pub struct ArrivalLog {
    counts: FxHashMap<String, u32>,
    total: u64,
    last: Option<(String, Coordinate)>,
}

impl ArrivalLog {
    pub fn record(&mut self, vehicle: &str, at: Coordinate) {
        *self.counts.entry(vehicle.to_owned()).or_insert(0) += 1;
        self.total += 1;
        self.last = Some((vehicle.to_owned(), at));
    }

    /// Arrivals recorded for `vehicle` (0 if it never arrived).
    pub fn count(&self, vehicle: &str) -> u32 {
        self.counts.get(vehicle).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn last(&self) -> Option<&(String, Coordinate)> {
        self.last.as_ref()
    }

    /// Drop the count of a vehicle that left the route list. The total is
    /// kept.
    pub fn forget(&mut self, vehicle: &str) {
        self.counts.remove(vehicle);
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
        self.last = None;
    }
}
