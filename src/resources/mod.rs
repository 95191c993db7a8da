//! ECS resources and host-side state of a map view.
//!
//! Overview
//! - `arrivallog` – per-vehicle arrival counts filled by the arrival observer
//! - `framehost` – the host's per-frame callback facility (manual and paced)
//! - `mapconfig` – animation tuning loaded from `config.ini`
//! - `mapsurface` – latest marker snapshot and the channel to the renderer
//! - `session` – entities and pending frame request of a mounted view
//! - `sitecontent` – page text, facilities and routes of a site variant
//! - `worldtime` – frame clock
pub mod arrivallog;
pub mod framehost;
pub mod mapconfig;
pub mod mapsurface;
pub mod session;
pub mod sitecontent;
pub mod worldtime;
