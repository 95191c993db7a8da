//! ECS components for map markers.
//!
//! Submodules overview:
//! - [`facility`] – label of a fixed marker (plant, depot)
//! - [`geoposition`] – latitude/longitude of any marker, plus coordinate math
//! - [`route`] – the segment a vehicle travels and its arrival behaviour
//! - [`vehicle`] – stable identifier of an animated marker

pub mod facility;
pub mod geoposition;
pub mod route;
pub mod vehicle;
