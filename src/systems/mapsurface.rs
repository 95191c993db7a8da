//! Map frame publishing system.
//!
//! Runs after [`waypoint_system`](crate::systems::waypoint::waypoint_system)
//! and hands the resulting marker positions to the [`MapSurface`].

use bevy_ecs::prelude::*;
use smallvec::SmallVec;

use crate::components::facility::Facility;
use crate::components::geoposition::GeoPosition;
use crate::components::route::Route;
use crate::components::vehicle::Vehicle;
use crate::resources::mapsurface::{FacilityMarker, MapFrame, MapSurface, VehicleMarker};
use crate::resources::worldtime::WorldTime;

/// Snapshot every vehicle and facility into a [`MapFrame`] and publish it.
pub fn publish_map_frame(
    world_time: Res<WorldTime>,
    vehicles: Query<(&Vehicle, &GeoPosition, &Route)>,
    facilities: Query<(&Facility, &GeoPosition)>,
    mut surface: ResMut<MapSurface>,
) {
    let mut vehicle_markers: SmallVec<[VehicleMarker; 8]> = vehicles
        .iter()
        .map(|(vehicle, position, route)| VehicleMarker {
            id: vehicle.id.clone(),
            position: position.pos,
            heading_to: route.end,
            halted: route.halted,
        })
        .collect();
    vehicle_markers.sort_by(|a, b| a.id.cmp(&b.id));

    let mut facility_markers: SmallVec<[FacilityMarker; 8]> = facilities
        .iter()
        .map(|(facility, position)| FacilityMarker {
            label: facility.label.clone(),
            position: position.pos,
        })
        .collect();
    facility_markers.sort_by(|a, b| a.label.cmp(&b.label));

    surface.publish(MapFrame {
        frame: world_time.frame_count,
        elapsed: world_time.elapsed,
        vehicles: vehicle_markers,
        facilities: facility_markers,
    });
}
