//! Biochar site map library.
//!
//! The animated map widget of the biochar site: fixed facility markers plus
//! vehicles shuttling along straight routes, advanced one tick per host
//! frame. This module exposes the ECS components, resources, systems and
//! events, the [`view::MapView`] that ties them to a frame host, and the
//! page content model.

pub mod components;
pub mod events;
pub mod page;
pub mod resources;
pub mod systems;
pub mod view;
