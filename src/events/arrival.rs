//! Vehicle arrival events.
//!
//! When the [`waypoint_system`](crate::systems::waypoint::waypoint_system)
//! detects that a vehicle reached its current target, it triggers an
//! [`ArrivalEvent`]. The [`arrival_observer`] records it in the
//! [`ArrivalLog`] resource; games or hosts can add their own observers too.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<ArrivalEvent>| {
//!     if trigger.halted {
//!         println!("{} parked at {:?}", trigger.vehicle, trigger.at);
//!     }
//! });
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::geoposition::Coordinate;
use crate::resources::arrivallog::ArrivalLog;

/// Event emitted when a vehicle reaches the end of its current leg.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ArrivalEvent {
    /// The vehicle entity.
    pub entity: Entity,
    /// The vehicle identifier.
    pub vehicle: String,
    /// Where the vehicle was when arrival was detected.
    pub at: Coordinate,
    /// The target of the next leg (equal to `at` once halted).
    pub next_target: Coordinate,
    /// Arrivals so far, including this one.
    pub arrivals: u32,
    /// True when the vehicle will not move again.
    pub halted: bool,
}

/// Observer that records every arrival in the [`ArrivalLog`].
pub fn arrival_observer(trigger: On<ArrivalEvent>, mut arrival_log: ResMut<ArrivalLog>) {
    debug!(
        "{} arrived at ({:.6}, {:.6}), arrival #{}{}",
        trigger.vehicle,
        trigger.at.lat,
        trigger.at.lng,
        trigger.arrivals,
        if trigger.halted { ", halted" } else { "" }
    );
    arrival_log.record(&trigger.vehicle, trigger.at);
}
