//! Owning facade over the registries and per-tick passes. Collaborators
//! (network poller, UI scan trigger, render loop) mutate state only through
//! the entry points here; the renderer reads the resulting positions and
//! drains the removal queues, never reaching into internal structures.

use crate::config::WorldConfig;
use crate::graph::{Edge, EdgeRegistry, Node, NodeRegistry, UpdateOptions};
use crate::physics::ForceSimulator;
use crate::satellite::SatelliteLayout;
use crate::snapshot::{NetworkSnapshot, TrafficEvent};
use crate::traffic::{TrafficAnimator, TrafficMarker};

pub struct World {
    nodes: NodeRegistry,
    edges: EdgeRegistry,
    simulator: ForceSimulator,
    satellites: SatelliteLayout,
    traffic: TrafficAnimator,
    config: WorldConfig,
    last_seq: Option<u64>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            nodes: NodeRegistry::new(),
            edges: EdgeRegistry::new(config.edges),
            simulator: ForceSimulator::new(),
            satellites: SatelliteLayout::new(config.orbit_radius),
            traffic: TrafficAnimator::new(config.traffic_step),
            config,
            last_seq: None,
        }
    }

    /// Apply one polled snapshot: node reconciliation, then edge
    /// reconciliation against the updated node set. The call is atomic with
    /// respect to ticks; overlapping fetches are guarded by the optional
    /// monotonic sequence number, so a slower stale response cannot
    /// overwrite a newer one. Returns whether the snapshot was applied.
    pub fn apply_snapshot(&mut self, snapshot: &NetworkSnapshot, options: UpdateOptions) -> bool {
        if let (Some(seq), Some(last)) = (snapshot.seq, self.last_seq)
            && seq <= last
        {
            log::warn!("discarding stale snapshot {seq}; latest applied is {last}");
            return false;
        }
        if let Some(seq) = snapshot.seq {
            self.last_seq = Some(seq);
        }

        self.nodes.update(&snapshot.nodes, options);
        self.edges.update(&snapshot.edges, &self.nodes);
        true
    }

    /// One simulation step, invoked once per frame by the external loop:
    /// force integration, satellite orbits, edge endpoint refresh, traffic.
    pub fn tick(&mut self) {
        self.simulator
            .step(&mut self.nodes, &self.edges, self.config.physics);
        self.satellites.step(&mut self.nodes);
        self.edges.refresh_positions(&self.nodes);
        self.traffic.step(&self.nodes);
    }

    pub fn record_traffic(&mut self, event: &TrafficEvent) -> Option<u64> {
        self.traffic.record(event, &self.nodes)
    }

    pub fn spawn_children(&mut self, parent_id: &str, ports: &[u16]) -> usize {
        self.nodes.spawn_children(parent_id, ports)
    }

    pub fn remove_children(&mut self, parent_id: &str) -> usize {
        self.nodes.remove_children(parent_id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.nodes()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.all()
    }

    pub fn traffic_markers(&self) -> &[TrafficMarker] {
        self.traffic.markers()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn drain_removed_nodes(&mut self) -> Vec<String> {
        self.nodes.drain_removed()
    }

    pub fn drain_removed_edges(&mut self) -> Vec<String> {
        self.edges.drain_removed()
    }

    pub fn drain_expired_traffic(&mut self) -> Vec<u64> {
        self.traffic.drain_expired()
    }
}
