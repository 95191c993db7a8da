//! Waypoint animation system.
//!
//! Moves every vehicle one step toward the end of its [`Route`] per tick:
//! - [`RouteMode::Shuttle`] – constant step along the unit vector; when the
//!   Euclidean distance left is below the step the vehicle snaps onto the
//!   target and the endpoints swap
//! - [`RouteMode::PingPong`] – same motion, but arrival is an independent
//!   per-axis epsilon test and the tick that detects it does not move
//! - [`RouteMode::Approach`] – covers a fixed fraction of the remaining
//!   difference and halts for good inside the epsilon box
//!
//! Each vehicle reads only its own state, so the order in which the query
//! visits them does not matter. Zero remaining distance is always arrival;
//! nothing here divides by it.

use bevy_ecs::prelude::*;

use crate::components::geoposition::{Coordinate, GeoPosition};
use crate::components::route::{Route, RouteMode};
use crate::components::vehicle::Vehicle;
use crate::events::arrival::ArrivalEvent;

/// What one tick did to a vehicle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved toward the target.
    Moved,
    /// Reached the target; the route now points the other way.
    Arrived,
    /// Reached the target and will not move again.
    Halted,
    /// Already halted, nothing to do.
    Idle,
}

/// `pos` moved `step` along the direction of `diff`, whose length is `distance`.
fn step_along(pos: Coordinate, diff: Coordinate, distance: f64, step: f64) -> Coordinate {
    Coordinate::new(
        pos.lat + step * (diff.lat / distance),
        pos.lng + step * (diff.lng / distance),
    )
}

/// Advance one vehicle by one tick.
pub fn advance(pos: &mut Coordinate, route: &mut Route) -> StepOutcome {
    if route.halted {
        return StepOutcome::Idle;
    }
    let diff = route.end - *pos;
    let distance = diff.length();

    match route.mode {
        RouteMode::Shuttle => {
            // `step > 0` makes this cover `distance == 0` as well.
            if distance < route.step {
                *pos = route.end;
                route.reverse();
                route.arrivals += 1;
                return StepOutcome::Arrived;
            }
            *pos = step_along(*pos, diff, distance, route.step);
            StepOutcome::Moved
        }
        RouteMode::PingPong { epsilon } => {
            if pos.within_axis_epsilon(route.end, epsilon) {
                route.reverse();
                route.arrivals += 1;
                return StepOutcome::Arrived;
            }
            if distance <= route.step {
                // Land on the target so the next tick sees it, whatever the epsilon.
                *pos = route.end;
            } else {
                *pos = step_along(*pos, diff, distance, route.step);
            }
            StepOutcome::Moved
        }
        RouteMode::Approach { rate, epsilon } => {
            if pos.within_axis_epsilon(route.end, epsilon) {
                route.halted = true;
                route.arrivals += 1;
                return StepOutcome::Halted;
            }
            *pos = *pos + diff * rate;
            StepOutcome::Moved
        }
    }
}

/// Advance every vehicle and trigger an [`ArrivalEvent`] for each arrival.
pub fn waypoint_system(
    mut query: Query<(Entity, &Vehicle, &mut GeoPosition, &mut Route)>,
    mut commands: Commands,
) {
    for (entity, vehicle, mut position, mut route) in query.iter_mut() {
        if route.halted {
            continue;
        }
        let outcome = advance(&mut position.pos, &mut route);
        if matches!(outcome, StepOutcome::Arrived | StepOutcome::Halted) {
            commands.trigger(ArrivalEvent {
                entity,
                vehicle: vehicle.id.clone(),
                at: position.pos,
                next_target: if route.halted {
                    position.pos
                } else {
                    route.end
                },
                arrivals: route.arrivals,
                halted: route.halted,
            });
        }
    }
}
