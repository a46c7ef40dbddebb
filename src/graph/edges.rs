use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::config::EdgePolicy;
use crate::snapshot::EdgeSnapshot;

use super::NodeRegistry;

/// Directed edge identity. `A-B` and `B-A` are distinct keys; the snapshot's
/// `{source, target}` records are taken at face value.
pub fn edge_key(source: &str, target: &str) -> String {
    format!("{source}-{target}")
}

/// A logical adjacency fact plus the endpoint positions re-derived every
/// tick, so the renderer can redraw the line without resolving ids itself.
#[derive(Clone, Debug)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub source_pos: Vec3,
    pub target_pos: Vec3,
}

impl Edge {
    pub fn key(&self) -> String {
        edge_key(&self.source_id, &self.target_id)
    }
}

pub struct EdgeRegistry {
    edges: HashMap<String, Edge>,
    removed: Vec<String>,
    policy: EdgePolicy,
}

impl EdgeRegistry {
    pub fn new(policy: EdgePolicy) -> Self {
        Self {
            edges: HashMap::new(),
            removed: Vec::new(),
            policy,
        }
    }

    /// Reconcile against one polled edge list. Keys absent from the incoming
    /// set are removed (and queued for [`Self::drain_removed`]) unless the
    /// `retain_missing` policy is set. New edges are recorded only when both
    /// endpoints resolve; otherwise they are skipped and will reappear
    /// naturally once a later snapshot lists them alongside both nodes.
    pub fn update(&mut self, snapshot: &[EdgeSnapshot], nodes: &NodeRegistry) {
        if !self.policy.retain_missing {
            let incoming = snapshot
                .iter()
                .map(|edge| edge_key(&edge.source, &edge.target))
                .collect::<HashSet<_>>();
            let stale = self
                .edges
                .keys()
                .filter(|key| !incoming.contains(*key))
                .cloned()
                .collect::<Vec<_>>();
            for key in stale {
                log::debug!("removing edge {key}");
                self.edges.remove(&key);
                self.removed.push(key);
            }
        }

        for entry in snapshot {
            let key = edge_key(&entry.source, &entry.target);
            if self.edges.contains_key(&key) {
                continue;
            }
            let (Some(source), Some(target)) = (nodes.get(&entry.source), nodes.get(&entry.target))
            else {
                log::debug!("skipping edge {key}: unresolved endpoint");
                continue;
            };
            self.edges.insert(
                key,
                Edge {
                    source_id: entry.source.clone(),
                    target_id: entry.target.clone(),
                    source_pos: source.position,
                    target_pos: target.position,
                },
            );
        }

        // Nodes may have been removed by the node pass of the same snapshot;
        // referential integrity must hold after every update call.
        self.refresh_positions(nodes);
    }

    /// Re-derive endpoint positions from current node state, called every
    /// tick after the simulator has moved nodes. Edges whose endpoints no
    /// longer resolve are dropped here, regardless of removal policy.
    pub fn refresh_positions(&mut self, nodes: &NodeRegistry) {
        let removed = &mut self.removed;
        self.edges.retain(|key, edge| {
            match (nodes.get(&edge.source_id), nodes.get(&edge.target_id)) {
                (Some(source), Some(target)) => {
                    edge.source_pos = source.position;
                    edge.target_pos = target.position;
                    true
                }
                _ => {
                    log::debug!("dropping edge {key}: endpoint removed");
                    removed.push(key.clone());
                    false
                }
            }
        });
    }

    pub fn all(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.edges.contains_key(&edge_key(source, target))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Keys removed since the last drain, for the renderer to release the
    /// matching drawables.
    pub fn drain_removed(&mut self) -> Vec<String> {
        std::mem::take(&mut self.removed)
    }
}
