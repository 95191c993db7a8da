//! Map view systems.
//!
//! Submodules overview
//! - [`mapsurface`] – snapshot marker positions into a [`crate::resources::mapsurface::MapFrame`]
//! - [`time`] – advance the frame clock
//! - [`waypoint`] – move vehicles along their routes, detect arrival, reverse

pub mod mapsurface;
pub mod time;
pub mod waypoint;
