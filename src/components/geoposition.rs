//! Geographic coordinates and the position component for map markers.
//!
//! Coordinates are treated as planar (lat, lng) pairs: distances are plain
//! Euclidean norms over degrees, which is what the marker animation needs at
//! city scale.

use std::ops::{Add, Mul, Sub};

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    /// Euclidean norm of the pair, used when the coordinate is a difference.
    pub fn length(self) -> f64 {
        self.lat.hypot(self.lng)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Coordinate) -> f64 {
        (other - self).length()
    }

    /// Both axes are finite (no NaN, no infinity).
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// True when both axis differences to `other` are below `epsilon`.
    pub fn within_axis_epsilon(self, other: Coordinate, epsilon: f64) -> bool {
        (other.lat - self.lat).abs() < epsilon && (other.lng - self.lng).abs() < epsilon
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.lat + rhs.lat, self.lng + rhs.lng)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.lat - rhs.lat, self.lng - rhs.lng)
    }
}

impl Mul<f64> for Coordinate {
    type Output = Coordinate;

    fn mul(self, k: f64) -> Coordinate {
        Coordinate::new(self.lat * k, self.lng * k)
    }
}

/// Where a marker currently sits on the map.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct GeoPosition {
    pub pos: Coordinate,
}

impl GeoPosition {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPosition {
            pos: Coordinate::new(lat, lng),
        }
    }
}

impl From<Coordinate> for GeoPosition {
    fn from(pos: Coordinate) -> Self {
        GeoPosition { pos }
    }
}
