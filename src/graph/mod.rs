//! Authoritative in-memory stores for node and edge identity. Everything the
//! renderer draws is a projection of this state; collaborators mutate it only
//! through the registry entry points.

mod edges;
mod nodes;

use glam::Vec3;
use serde_json::{Map, Value};

pub use edges::{Edge, EdgeRegistry, edge_key};
pub use nodes::{NodeRegistry, UpdateOptions, child_id};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Router,
    Device,
    External,
    Child,
    Ship,
}

/// Where a newly discovered node of a given kind first materializes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    Origin,
    NearRing,
    FarRing,
}

impl NodeKind {
    /// Lenient mapping from the snapshot's `type` tag. Absent tags default to
    /// a local device; unrecognized tags are treated as external endpoints,
    /// which only affects initial placement.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("router") => Self::Router,
            Some("device") | None => Self::Device,
            Some("external") => Self::External,
            Some("child") => Self::Child,
            Some("ship") => Self::Ship,
            Some(_) => Self::External,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Router => "router",
            Self::Device => "device",
            Self::External => "external",
            Self::Child => "child",
            Self::Ship => "ship",
        }
    }

    /// Whether the force integrator moves this node at all. Children are
    /// orbiters positioned by [`SatelliteLayout`](crate::SatelliteLayout) and
    /// neither exert nor receive simulation forces.
    pub fn free_body(self) -> bool {
        !matches!(self, Self::Child)
    }

    /// Pinned nodes exert forces but never receive them; the integrator
    /// resets them to the origin every tick.
    pub fn pinned(self) -> bool {
        matches!(self, Self::Router)
    }

    pub(crate) fn placement(self) -> Placement {
        match self {
            Self::Router | Self::Ship => Placement::Origin,
            Self::Device | Self::Child => Placement::NearRing,
            Self::External => Placement::FarRing,
        }
    }
}

/// Angular slot of a child satellite around its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrbitSlot {
    pub port: u16,
    /// Position within the scanned port list.
    pub index: usize,
    /// Length of the scanned port list at spawn time.
    pub total: usize,
    /// The router's externally exposed port sits at a fixed offset above the
    /// sibling ring instead of being spaced among them.
    pub fixed_angle: bool,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Open attribute bag merged shallowly from successive snapshots.
    pub metadata: Map<String, Value>,
    /// Non-owning reference: the parent may be removed independently, and a
    /// dangling id here is tolerated by every consumer.
    pub parent_id: Option<String>,
    pub orbit: Option<OrbitSlot>,
}

impl Node {
    pub fn label(&self) -> Option<&str> {
        self.metadata.get("label").and_then(Value::as_str)
    }

    pub fn color(&self) -> Option<&str> {
        self.metadata.get("color").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_round_trip() {
        for kind in [
            NodeKind::Router,
            NodeKind::Device,
            NodeKind::External,
            NodeKind::Child,
            NodeKind::Ship,
        ] {
            assert_eq!(NodeKind::from_label(Some(kind.label())), kind);
        }
    }

    #[test]
    fn unknown_and_missing_labels_fall_back() {
        assert_eq!(NodeKind::from_label(None), NodeKind::Device);
        assert_eq!(NodeKind::from_label(Some("satellite-dish")), NodeKind::External);
    }

    #[test]
    fn only_children_are_excluded_from_forces() {
        assert!(!NodeKind::Child.free_body());
        assert!(NodeKind::Router.free_body());
        assert!(NodeKind::Ship.free_body());
        assert!(NodeKind::Router.pinned());
        assert!(!NodeKind::External.pinned());
    }
}
