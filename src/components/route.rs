//! Route component for animated vehicle markers.
//!
//! A [`Route`] holds the segment a vehicle travels along and how it behaves
//! on arrival. See [`crate::systems::waypoint`] for the per-tick update.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use super::geoposition::Coordinate;

/// Default per-tick step in degrees.
pub const DEFAULT_STEP: f64 = 0.0005;
/// Default per-axis arrival threshold for [`RouteMode::PingPong`] and [`RouteMode::Approach`].
pub const DEFAULT_EPSILON: f64 = 0.0001;
/// Default fraction of the remaining distance covered per tick by [`RouteMode::Approach`].
pub const DEFAULT_APPROACH_RATE: f64 = 0.001;

/// Determines how a vehicle moves and what happens when it reaches `end`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteMode {
    /// Constant step along the unit vector. Arrival when the Euclidean
    /// distance drops below the step: snap to `end`, then swap endpoints.
    #[default]
    Shuttle,
    /// Constant step along the unit vector. Arrival when both axis
    /// differences fall below `epsilon`: swap endpoints without moving.
    PingPong { epsilon: f64 },
    /// Cover `rate` of the remaining difference each tick and halt for good
    /// once both axis differences fall below `epsilon`.
    Approach { rate: f64, epsilon: f64 },
}

impl RouteMode {
    /// Parse a mode name as written in `config.ini`.
    pub fn from_name(name: &str, epsilon: f64, rate: f64) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "shuttle" => Some(RouteMode::Shuttle),
            "ping_pong" | "pingpong" | "ping-pong" => Some(RouteMode::PingPong { epsilon }),
            "approach" => Some(RouteMode::Approach { rate, epsilon }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RouteMode::Shuttle => "shuttle",
            RouteMode::PingPong { .. } => "ping_pong",
            RouteMode::Approach { .. } => "approach",
        }
    }
}

/// The segment a vehicle travels and its progress counters.
///
/// `start` and `end` are swapped every time the vehicle arrives, so `end` is
/// always the current target.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Route {
    /// Where the current leg began.
    pub start: Coordinate,
    /// Current target.
    pub end: Coordinate,
    /// Distance covered per tick, in degrees.
    pub step: f64,
    pub mode: RouteMode,
    /// Number of arrivals since the vehicle was spawned.
    pub arrivals: u32,
    /// Set once an [`RouteMode::Approach`] vehicle reaches its target.
    pub halted: bool,
}

impl Route {
    pub fn new(start: Coordinate, end: Coordinate, step: f64) -> Self {
        Route {
            start,
            end,
            step,
            mode: RouteMode::Shuttle,
            arrivals: 0,
            halted: false,
        }
    }

    pub fn with_mode(mut self, mode: RouteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Swap endpoints so the next leg heads back to where this one began.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }

    /// Reject inputs that would put NaN into positions.
    pub fn validate(&self) -> Result<(), String> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(format!("non-finite endpoint ({:?} -> {:?})", self.start, self.end));
        }
        match self.mode {
            RouteMode::Shuttle => check_positive("step", self.step),
            RouteMode::PingPong { epsilon } => {
                check_positive("step", self.step)?;
                check_positive("epsilon", epsilon)
            }
            RouteMode::Approach { rate, epsilon } => {
                check_positive("epsilon", epsilon)?;
                if !(rate.is_finite() && rate > 0.0 && rate <= 1.0) {
                    return Err(format!("approach rate must be in (0, 1], got {rate}"));
                }
                Ok(())
            }
        }
    }
}

fn check_positive(what: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{what} must be a positive finite number, got {value}"))
    }
}
