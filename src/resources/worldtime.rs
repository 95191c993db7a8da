use bevy_ecs::prelude::Resource;

/// Frame clock of a mounted view.
///
/// The waypoint animation advances one step per frame regardless of
/// `delta`; `elapsed` and `frame_count` are reported in every
/// [`MapFrame`](crate::resources::mapsurface::MapFrame).
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
