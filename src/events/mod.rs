//! Event types and observers used by the map view.
//!
//! Submodules:
//! - [`arrival`] – a vehicle reached the end of its current leg
pub mod arrival;
