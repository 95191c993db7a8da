//! Hand-off point between the animation and whatever draws the map.
//!
//! After every tick [`publish_map_frame`](crate::systems::mapsurface::publish_map_frame)
//! builds a [`MapFrame`] with every marker's coordinate. The [`MapSurface`]
//! keeps the latest one and, when created with [`MapSurface::with_channel`],
//! also sends it to a receiver living elsewhere (a renderer thread, the
//! preview binary's JSON printer).

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, warn};
use serde::Serialize;
use smallvec::SmallVec;

use crate::components::geoposition::Coordinate;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VehicleMarker {
    pub id: String,
    pub position: Coordinate,
    /// Current target of the vehicle.
    pub heading_to: Coordinate,
    pub halted: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FacilityMarker {
    pub label: String,
    pub position: Coordinate,
}

/// Every marker position after one tick. Vehicles are sorted by id,
/// facilities by label.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MapFrame {
    pub frame: u64,
    pub elapsed: f32,
    pub vehicles: SmallVec<[VehicleMarker; 8]>,
    pub facilities: SmallVec<[FacilityMarker; 8]>,
}

impl MapFrame {
    pub fn vehicle(&self, id: &str) -> Option<&VehicleMarker> {
        self.vehicles.iter().find(|v| v.id == id)
    }
}

#[derive(Resource, Debug, Default)]
pub struct MapSurface {
    latest: Option<MapFrame>,
    sink: Option<Sender<MapFrame>>,
    published: u64,
    dropped: u64,
}

impl MapSurface {
    /// Surface that also forwards frames to the returned receiver.
    ///
    /// With `capacity = Some(n)` frames that find the channel full are
    /// dropped rather than blocking the tick.
    pub fn with_channel(capacity: Option<usize>) -> (Self, Receiver<MapFrame>) {
        let (tx, rx) = match capacity {
            Some(n) => crossbeam_channel::bounded(n),
            None => crossbeam_channel::unbounded(),
        };
        let surface = MapSurface {
            sink: Some(tx),
            ..Default::default()
        };
        (surface, rx)
    }

    pub fn publish(&mut self, frame: MapFrame) {
        let sent = match &self.sink {
            Some(tx) => tx.try_send(frame.clone()),
            None => Ok(()),
        };
        match sent {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                debug!("map frame {} dropped, receiver is behind", frame.frame);
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("map frame receiver disconnected, detaching sink");
                self.sink = None;
            }
        }
        self.latest = Some(frame);
        self.published += 1;
    }

    pub fn latest(&self) -> Option<&MapFrame> {
        self.latest.as_ref()
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    /// Frames not delivered because a bounded channel was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub(crate) fn clear_latest(&mut self) {
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: u64) -> MapFrame {
        MapFrame {
            frame: n,
            ..Default::default()
        }
    }

    #[test]
    fn test_publish_without_sink_keeps_latest() {
        let mut surface = MapSurface::default();
        surface.publish(frame(1));
        surface.publish(frame(2));
        assert_eq!(surface.latest().unwrap().frame, 2);
        assert_eq!(surface.published(), 2);
    }

    #[test]
    fn test_publish_forwards_to_channel() {
        let (mut surface, rx) = MapSurface::with_channel(None);
        surface.publish(frame(1));
        surface.publish(frame(2));
        let got: Vec<u64> = rx.try_iter().map(|f| f.frame).collect();
        assert_eq!(got, vec![1, 2]);
    }

    #[test]
    fn test_full_bounded_channel_drops_frames() {
        let (mut surface, rx) = MapSurface::with_channel(Some(1));
        surface.publish(frame(1));
        surface.publish(frame(2));
        assert_eq!(surface.dropped(), 1);
        assert_eq!(rx.try_recv().unwrap().frame, 1);
        assert_eq!(surface.latest().unwrap().frame, 2);
    }

    #[test]
    fn test_disconnected_receiver_detaches_sink() {
        let (mut surface, rx) = MapSurface::with_channel(None);
        drop(rx);
        surface.publish(frame(1));
        assert!(!surface.has_sink());
        assert_eq!(surface.latest().unwrap().frame, 1);
    }

    #[test]
    fn test_frame_serializes_as_json() {
        let mut f = frame(7);
        f.vehicles.push(VehicleMarker {
            id: "van-1".to_owned(),
            position: Coordinate::new(1.0, 2.0),
            heading_to: Coordinate::new(3.0, 4.0),
            halted: false,
        });
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["frame"], 7);
        assert_eq!(json["vehicles"][0]["id"], "van-1");
        assert_eq!(json["vehicles"][0]["position"]["lng"], 2.0);
    }
}
