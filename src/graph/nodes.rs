use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::hash_map::Entry;
use std::f32::consts::TAU;

use glam::Vec3;
use serde_json::{Map, Value};

use crate::math::{stable_triple, unit};
use crate::snapshot::NodeSnapshot;

use super::{Node, NodeKind, OrbitSlot, Placement};

const NEAR_RING_RADIUS: f32 = 30.0;
const NEAR_RING_SPREAD: f32 = 20.0;
const NEAR_RING_DEPTH: f32 = 10.0;
const FAR_RING_RADIUS: f32 = 100.0;
const FAR_RING_SPREAD: f32 = 50.0;
const FAR_RING_DEPTH: f32 = 25.0;

#[derive(Clone, Copy, Debug)]
pub struct UpdateOptions {
    /// When set, a stored position always wins over whatever the snapshot
    /// carries. Defends against the backend re-sending a node without
    /// position continuity.
    pub preserve_positions: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            preserve_positions: true,
        }
    }
}

/// Deterministic child identity: re-scanning a parent yields the same ids.
pub fn child_id(parent_id: &str, port: u16) -> String {
    format!("{parent_id}-port-{port}")
}

pub struct NodeRegistry {
    nodes: HashMap<String, Node>,
    removed: Vec<String>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            removed: Vec::new(),
        }
    }

    /// Reconcile the registry against one polled snapshot: create-or-update
    /// every listed node, then delete everything absent from it except
    /// `child` nodes, whose lifetime is governed by explicit spawn/removal
    /// calls only. Entries without an id are skipped, never fatal.
    pub fn update(&mut self, snapshot: &[NodeSnapshot], options: UpdateOptions) {
        let mut router_pos = self.router_position();
        let mut seen = HashSet::with_capacity(snapshot.len());

        for entry in snapshot {
            if entry.id.is_empty() {
                log::warn!("skipping node entry without id");
                continue;
            }
            seen.insert(entry.id.as_str());

            let kind = NodeKind::from_label(entry.kind.as_deref());
            if entry.kind.is_some() && kind == NodeKind::Child {
                log::warn!(
                    "skipping node entry {}: child nodes are spawned, not polled",
                    entry.id
                );
                continue;
            }
            match self.nodes.entry(entry.id.clone()) {
                Entry::Occupied(mut occupied) => {
                    let node = occupied.get_mut();
                    // The type tag is optional on re-sends; absence means
                    // "unchanged", not a demotion to the creation default.
                    // Child kinds are never governed by snapshots at all.
                    if entry.kind.is_some() && node.kind != NodeKind::Child {
                        node.kind = kind;
                    }
                    for (key, value) in &entry.metadata {
                        node.metadata.insert(key.clone(), value.clone());
                    }
                    if let Some(position) = entry.position
                        && !options.preserve_positions
                    {
                        node.position = Vec3::from_array(position);
                    }
                }
                Entry::Vacant(vacant) => {
                    let position = entry
                        .position
                        .map(Vec3::from_array)
                        .unwrap_or_else(|| initial_position(&entry.id, kind, router_pos));
                    log::debug!("adding node {} ({})", entry.id, kind.label());
                    vacant.insert(Node {
                        id: entry.id.clone(),
                        kind,
                        position,
                        velocity: Vec3::ZERO,
                        metadata: entry.metadata.clone(),
                        parent_id: None,
                        orbit: None,
                    });
                    if kind == NodeKind::Router {
                        router_pos = Some(position);
                    }
                }
            }
        }

        let stale = self
            .nodes
            .values()
            .filter(|node| node.kind != NodeKind::Child && !seen.contains(node.id.as_str()))
            .map(|node| node.id.clone())
            .collect::<Vec<_>>();
        for id in stale {
            log::debug!("removing node {id}");
            self.nodes.remove(&id);
            self.removed.push(id);
        }
    }

    /// Create one satellite per port not already present, spaced evenly
    /// around the parent. Existing satellites get their angular slot
    /// refreshed so a re-scan with a different port list re-spaces them.
    /// A router parent advertising `open_external_port` additionally gets
    /// one distinguished satellite at a fixed offset.
    ///
    /// Returns the number of newly created nodes.
    pub fn spawn_children(&mut self, parent_id: &str, ports: &[u16]) -> usize {
        let Some(parent) = self.nodes.get(parent_id) else {
            log::warn!("cannot spawn children: unknown parent {parent_id}");
            return 0;
        };
        let parent_pos = parent.position;
        let parent_kind = parent.kind;
        let external_port = parent
            .metadata
            .get("open_external_port")
            .and_then(Value::as_u64)
            .and_then(|port| u16::try_from(port).ok());

        let mut created = 0;

        if parent_kind == NodeKind::Router
            && let Some(port) = external_port
        {
            let slot = OrbitSlot {
                port,
                index: 0,
                total: 1,
                fixed_angle: true,
            };
            let id = format!("external-port-{port}");
            let label = format!("External Port {port}");
            created += self.upsert_child(id, parent_id, parent_pos, slot, label);
        }

        for (index, &port) in ports.iter().enumerate() {
            let slot = OrbitSlot {
                port,
                index,
                total: ports.len(),
                fixed_angle: false,
            };
            let id = child_id(parent_id, port);
            let label = format!("Port {port}");
            created += self.upsert_child(id, parent_id, parent_pos, slot, label);
        }

        created
    }

    fn upsert_child(
        &mut self,
        id: String,
        parent_id: &str,
        parent_pos: Vec3,
        slot: OrbitSlot,
        label: String,
    ) -> usize {
        match self.nodes.entry(id) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().orbit = Some(slot);
                0
            }
            Entry::Vacant(vacant) => {
                log::debug!("spawning satellite {} for {parent_id}", vacant.key());
                let id = vacant.key().clone();
                let mut metadata = Map::new();
                metadata.insert("label".to_owned(), Value::String(label));
                metadata.insert("port".to_owned(), Value::from(slot.port));
                vacant.insert(Node {
                    id,
                    kind: NodeKind::Child,
                    position: parent_pos,
                    velocity: Vec3::ZERO,
                    metadata,
                    parent_id: Some(parent_id.to_owned()),
                    orbit: Some(slot),
                });
                1
            }
        }
    }

    /// The explicit removal path for satellites; snapshots never remove them.
    pub fn remove_children(&mut self, parent_id: &str) -> usize {
        let doomed = self
            .nodes
            .values()
            .filter(|node| {
                node.kind == NodeKind::Child && node.parent_id.as_deref() == Some(parent_id)
            })
            .map(|node| node.id.clone())
            .collect::<Vec<_>>();

        let count = doomed.len();
        for id in doomed {
            self.nodes.remove(&id);
            self.removed.push(id);
        }
        count
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Unordered view over all live nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn router_position(&self) -> Option<Vec3> {
        self.nodes
            .values()
            .find(|node| node.kind == NodeKind::Router)
            .map(|node| node.position)
    }

    /// Ids deleted since the last drain, for the renderer to release
    /// the matching drawables.
    pub fn drain_removed(&mut self) -> Vec<String> {
        std::mem::take(&mut self.removed)
    }
}

/// A device discovered before any router rings the origin, which is where
/// the router will be pinned once it appears; the local cluster therefore
/// does not jump when the router shows up one poll later.
fn initial_position(id: &str, kind: NodeKind, router_pos: Option<Vec3>) -> Vec3 {
    let (jx, jy, jz) = stable_triple(id);
    let angle = unit(jx) * TAU;

    match kind.placement() {
        Placement::Origin => Vec3::ZERO,
        Placement::NearRing => {
            let center = router_pos.unwrap_or(Vec3::ZERO);
            let radius = NEAR_RING_RADIUS + unit(jy) * NEAR_RING_SPREAD;
            center
                + Vec3::new(
                    radius * angle.cos(),
                    radius * angle.sin(),
                    jz * NEAR_RING_DEPTH,
                )
        }
        Placement::FarRing => {
            let radius = FAR_RING_RADIUS + unit(jy) * FAR_RING_SPREAD;
            let depth = router_pos.map(|pos| pos.z).unwrap_or(0.0) + jz * FAR_RING_DEPTH;
            Vec3::new(radius * angle.cos(), radius * angle.sin(), depth)
        }
    }
}
