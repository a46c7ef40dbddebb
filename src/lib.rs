//! Incremental graph model and force-directed 3D layout for a live network
//! topology: hosts, the gateway router, external hops, and scan-derived port
//! satellites, continuously reconciled against polled backend snapshots.
//!
//! The crate owns no rendering, networking, or UI. An external render loop
//! feeds snapshots into [`World::apply_snapshot`], calls [`World::tick`] once
//! per frame, and reads the resulting positions through the read-only views.

pub mod config;
pub mod graph;
mod math;
pub mod physics;
pub mod satellite;
pub mod snapshot;
pub mod traffic;
pub mod world;

pub use config::{EdgePolicy, PhysicsConfig, WorldConfig};
pub use graph::{
    Edge, EdgeRegistry, Node, NodeKind, NodeRegistry, OrbitSlot, UpdateOptions, child_id, edge_key,
};
pub use physics::ForceSimulator;
pub use satellite::SatelliteLayout;
pub use snapshot::{
    EdgeSnapshot, NetworkSnapshot, NodeSnapshot, ScanResult, TrafficEvent, parse_network_payload,
};
pub use traffic::{TrafficAnimator, TrafficMarker};
pub use world::World;
