//! The map widget: an ECS world animated one tick per host frame.
//!
//! [`MapView`] owns the world, the tick schedule and the [`FrameHost`]. Its
//! lifecycle mirrors a UI component:
//!
//! 1. [`MapView::mount`] validates the content, spawns facilities and
//!    vehicles, and requests the first frame
//! 2. [`MapView::on_frame`] runs one tick for the pending request, publishes
//!    a [`MapFrame`], and requests the next frame
//! 3. [`MapView::unmount`] cancels the pending request and despawns
//!    everything; repeated calls do nothing
//!
//! Frame scheduling depends only on mount/unmount. Replacing the routes with
//! [`MapView::reconfigure`] touches entities, never the pending request.

use bevy_ecs::prelude::*;
use log::{debug, info, trace, warn};
use rustc_hash::FxHashMap;

use crate::components::facility::Facility;
use crate::components::geoposition::{Coordinate, GeoPosition};
use crate::components::route::Route;
use crate::components::vehicle::Vehicle;
use crate::events::arrival::arrival_observer;
use crate::resources::arrivallog::ArrivalLog;
use crate::resources::framehost::{FrameHandle, FrameHost, ManualFrameHost};
use crate::resources::mapconfig::MapConfig;
use crate::resources::mapsurface::{MapFrame, MapSurface};
use crate::resources::session::AnimationSession;
use crate::resources::sitecontent::{RouteSpec, SiteContent, validate_routes};
use crate::resources::worldtime::WorldTime;
use crate::systems::mapsurface::publish_map_frame;
use crate::systems::time::update_world_time;
use crate::systems::waypoint::waypoint_system;

/// What happens to in-flight vehicles when the route list is replaced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RebuildPolicy {
    /// Discard every vehicle and respawn each route at its start.
    Rebuild,
    /// Keep the current position and arrival count of vehicles whose id is
    /// still listed.
    PreserveById,
}

/// State carried over from a despawned vehicle under `PreserveById`.
struct Kept {
    position: Coordinate,
    arrivals: u32,
}

pub struct MapView<H: FrameHost> {
    world: World,
    schedule: Schedule,
    host: H,
}

impl<H: FrameHost> MapView<H> {
    pub fn new(host: H, config: MapConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(AnimationSession::default());
        world.insert_resource(ArrivalLog::default());
        world.insert_resource(MapSurface::default());
        world.insert_resource(config);
        world.add_observer(arrival_observer);

        let mut schedule = Schedule::default();
        schedule.add_systems((waypoint_system, publish_map_frame).chain());

        MapView {
            world,
            schedule,
            host,
        }
    }

    /// Replace the map surface, e.g. with one from [`MapSurface::with_channel`].
    pub fn with_surface(mut self, surface: MapSurface) -> Self {
        self.world.insert_resource(surface);
        self
    }

    /// Spawn the content's markers and start the session.
    ///
    /// Nothing is spawned if validation fails. Mounting an already mounted
    /// view unmounts it first.
    pub fn mount(&mut self, content: &SiteContent) -> Result<(), String> {
        content.validate(self.config())?;
        if self.is_mounted() {
            warn!("mount on a mounted view, unmounting the previous session");
            self.unmount();
        }

        self.world.insert_resource(WorldTime::default());
        self.world.resource_mut::<ArrivalLog>().clear();
        self.world.resource_mut::<MapSurface>().clear_latest();

        for facility in &content.facilities {
            let entity = self
                .world
                .spawn((
                    Facility::new(facility.label.clone()),
                    GeoPosition::from(facility.position),
                ))
                .id();
            self.world
                .resource_mut::<AnimationSession>()
                .add_facility(entity);
        }
        self.spawn_vehicles(&content.routes, &FxHashMap::default());

        let first = self.host.request_frame();
        let mut session = self.world.resource_mut::<AnimationSession>();
        session.begin(first);
        info!(
            "Mounted '{}': {} vehicles, {} facilities",
            content.title,
            session.vehicle_count(),
            session.facility_count()
        );
        Ok(())
    }

    /// Run one tick for `handle`.
    ///
    /// Returns `false` without touching the world when `handle` is not the
    /// request the session is waiting on (stale, cancelled, or unmounted).
    pub fn on_frame(&mut self, handle: FrameHandle, dt: f32) -> bool {
        {
            let mut session = self.world.resource_mut::<AnimationSession>();
            if !session.is_active() || session.pending() != Some(handle) {
                debug!(
                    "Ignoring frame {:?}, pending is {:?}",
                    handle,
                    session.pending()
                );
                return false;
            }
            session.take_pending();
        }

        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);

        let next = self.host.request_frame();
        self.world
            .resource_mut::<AnimationSession>()
            .record_tick(next);
        true
    }

    /// Cancel the pending frame and despawn everything. Safe to repeat.
    pub fn unmount(&mut self) {
        let (pending, entities, ticks) = {
            let mut session = self.world.resource_mut::<AnimationSession>();
            if !session.is_active() {
                trace!("unmount on an unmounted view");
                return;
            }
            let pending = session.take_pending();
            let ticks = session.ticks();
            (pending, session.end(), ticks)
        };
        if let Some(handle) = pending {
            self.host.cancel_frame(handle);
        }
        for entity in entities {
            self.world.despawn(entity);
        }
        info!("Unmounted after {} ticks", ticks);
    }

    /// Replace the vehicle routes between ticks.
    ///
    /// The pending frame request is left alone: the next frame animates the
    /// new set. On a validation error nothing changes.
    pub fn reconfigure(
        &mut self,
        routes: &[RouteSpec],
        policy: RebuildPolicy,
    ) -> Result<(), String> {
        validate_routes(routes, self.config())?;
        if !self.is_mounted() {
            return Err("reconfigure on an unmounted view".to_owned());
        }

        let old = self
            .world
            .resource_mut::<AnimationSession>()
            .drain_vehicles();
        let mut kept: FxHashMap<String, Kept> = FxHashMap::default();
        for (id, entity) in old {
            let listed = routes.iter().any(|r| r.id == id);
            if policy == RebuildPolicy::PreserveById {
                if listed {
                    let position = self.world.get::<GeoPosition>(entity).map(|p| p.pos);
                    let arrivals = self.world.get::<Route>(entity).map_or(0, |r| r.arrivals);
                    if let Some(position) = position {
                        kept.insert(id, Kept { position, arrivals });
                    }
                } else {
                    self.world.resource_mut::<ArrivalLog>().forget(&id);
                }
            }
            self.world.despawn(entity);
        }
        if policy == RebuildPolicy::Rebuild {
            self.world.resource_mut::<ArrivalLog>().clear();
        }

        self.spawn_vehicles(routes, &kept);
        debug!(
            "Reconfigured {} routes ({:?}), {} positions kept",
            routes.len(),
            policy,
            kept.len()
        );
        Ok(())
    }

    fn spawn_vehicles(&mut self, routes: &[RouteSpec], kept: &FxHashMap<String, Kept>) {
        for spec in routes {
            let mut route = spec.to_route(self.config());
            let position = match kept.get(&spec.id) {
                Some(k) => {
                    route.arrivals = k.arrivals;
                    k.position
                }
                None => spec.start,
            };
            let entity = self
                .world
                .spawn((Vehicle::new(spec.id.clone()), GeoPosition::from(position), route))
                .id();
            self.world
                .resource_mut::<AnimationSession>()
                .add_vehicle(spec.id.clone(), entity);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.session().is_active()
    }

    pub fn config(&self) -> &MapConfig {
        self.world.resource::<MapConfig>()
    }

    pub fn session(&self) -> &AnimationSession {
        self.world.resource::<AnimationSession>()
    }

    pub fn arrivals(&self) -> &ArrivalLog {
        self.world.resource::<ArrivalLog>()
    }

    pub fn latest_frame(&self) -> Option<&MapFrame> {
        self.world.resource::<MapSurface>().latest()
    }

    pub fn position(&self, id: &str) -> Option<Coordinate> {
        let entity = self.session().vehicle(id)?;
        self.world.get::<GeoPosition>(entity).map(|p| p.pos)
    }

    pub fn route(&self, id: &str) -> Option<&Route> {
        let entity = self.session().vehicle(id)?;
        self.world.get::<Route>(entity)
    }

    /// Current position of every vehicle, sorted by id.
    pub fn positions(&self) -> Vec<(String, Coordinate)> {
        self.session()
            .vehicle_ids()
            .into_iter()
            .filter_map(|id| self.position(&id).map(|pos| (id, pos)))
            .collect()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl MapView<ManualFrameHost> {
    /// Deliver up to `frames` due frames, `dt` seconds apart.
    ///
    /// Returns how many ticks actually ran.
    pub fn run_frames(&mut self, frames: usize, dt: f32) -> usize {
        let mut ran = 0;
        for _ in 0..frames {
            let Some(handle) = self.host.next_due() else {
                break;
            };
            if self.on_frame(handle, dt) {
                ran += 1;
            }
        }
        ran
    }
}
