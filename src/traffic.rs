//! Short-lived traffic markers interpolating between two live nodes,
//! independent of the layout simulation. Endpoint positions are re-read
//! every tick so a marker tracks nodes that are still being relaxed.

use glam::Vec3;

use crate::graph::NodeRegistry;
use crate::snapshot::TrafficEvent;

#[derive(Clone, Debug)]
pub struct TrafficMarker {
    /// Stable handle for the renderer's drawable.
    pub id: u64,
    pub origin_id: String,
    pub dest_id: String,
    /// Always in `[0, 1)` when observable; reaching 1 discards the marker.
    pub progress: f32,
    /// Presentation-only; affects marker radius, never core logic.
    pub size: f32,
    pub position: Vec3,
}

pub struct TrafficAnimator {
    progress_step: f32,
    next_id: u64,
    markers: Vec<TrafficMarker>,
    expired: Vec<u64>,
}

impl TrafficAnimator {
    pub fn new(progress_step: f32) -> Self {
        Self {
            progress_step,
            next_id: 0,
            markers: Vec::new(),
            expired: Vec::new(),
        }
    }

    /// Start a marker for one observed flow. Both endpoints must resolve;
    /// otherwise the event is dropped with a diagnostic.
    pub fn record(&mut self, event: &TrafficEvent, nodes: &NodeRegistry) -> Option<u64> {
        let Some(origin) = nodes.get(&event.src) else {
            log::debug!("dropping traffic event: unknown origin {}", event.src);
            return None;
        };
        if !nodes.contains(&event.dst) {
            log::debug!("dropping traffic event: unknown destination {}", event.dst);
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.markers.push(TrafficMarker {
            id,
            origin_id: event.src.clone(),
            dest_id: event.dst.clone(),
            progress: 0.0,
            size: event.size,
            position: origin.position,
        });
        Some(id)
    }

    /// Advance every marker; completed markers and markers with a removed
    /// endpoint are discarded into the expired queue.
    pub fn step(&mut self, nodes: &NodeRegistry) {
        let step = self.progress_step;
        let expired = &mut self.expired;
        self.markers.retain_mut(|marker| {
            marker.progress += step;
            if marker.progress >= 1.0 {
                expired.push(marker.id);
                return false;
            }
            let (Some(origin), Some(dest)) =
                (nodes.get(&marker.origin_id), nodes.get(&marker.dest_id))
            else {
                expired.push(marker.id);
                return false;
            };
            marker.position = origin.position.lerp(dest.position, marker.progress);
            true
        });
    }

    pub fn markers(&self) -> &[TrafficMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker ids discarded since the last drain, for the renderer to
    /// release the matching drawables.
    pub fn drain_expired(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.expired)
    }
}
