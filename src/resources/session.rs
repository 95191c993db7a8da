//! Animation session resource.
//!
//! One session per mounted view: the entities it spawned and the single
//! frame request it has outstanding with the host. See
//! [`crate::view::MapView`] for the lifecycle (mount, frame, unmount).

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

use crate::resources::framehost::FrameHandle;

#[derive(Resource, Debug, Default)]
pub struct AnimationSession {
    active: bool,
    pending: Option<FrameHandle>,
    ticks: u64,
    vehicles: FxHashMap<String, Entity>,
    facilities: Vec<Entity>,
}

impl AnimationSession {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The frame request the session is waiting on, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Ticks run since the session was mounted.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn vehicle(&self, id: &str) -> Option<Entity> {
        self.vehicles.get(id).copied()
    }

    /// Vehicle identifiers, sorted.
    pub fn vehicle_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.vehicles.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    pub(crate) fn begin(&mut self, pending: FrameHandle) {
        self.active = true;
        self.ticks = 0;
        self.pending = Some(pending);
    }

    pub(crate) fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Record a completed tick and the request for the one after it.
    pub(crate) fn record_tick(&mut self, next: FrameHandle) {
        self.ticks += 1;
        self.pending = Some(next);
    }

    pub(crate) fn add_vehicle(&mut self, id: impl Into<String>, entity: Entity) {
        self.vehicles.insert(id.into(), entity);
    }

    pub(crate) fn add_facility(&mut self, entity: Entity) {
        self.facilities.push(entity);
    }

    pub(crate) fn drain_vehicles(&mut self) -> Vec<(String, Entity)> {
        self.vehicles.drain().collect()
    }

    /// Ends the session and hands back every entity it owned.
    pub(crate) fn end(&mut self) -> Vec<Entity> {
        self.active = false;
        let mut entities: Vec<Entity> = self.vehicles.drain().map(|(_, e)| e).collect();
        entities.append(&mut self.facilities);
        entities
    }
}
