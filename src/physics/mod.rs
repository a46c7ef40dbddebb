//! Force-directed relaxation over the free-body nodes of the registry.
//!
//! A stateless pass applied to registry state each tick: repulsion over all
//! eligible pairs, spring attraction along edges, an outward bias on
//! external endpoints, then semi-implicit Euler integration with damping.
//! The O(n²) repulsion pass is deliberate; expected node counts are tens to
//! low hundreds. A spatial partition should replace it before this is
//! pointed at substantially larger graphs.

mod forces;

use std::collections::HashMap;

use glam::Vec3;

use crate::config::PhysicsConfig;
use crate::graph::{EdgeRegistry, NodeKind, NodeRegistry};
use forces::{outward_push, repulsion_between, spring_between};

#[derive(Default)]
pub struct ForceSimulator {
    scratch: ForceScratch,
}

#[derive(Default)]
struct ForceScratch {
    ids: Vec<String>,
    kinds: Vec<NodeKind>,
    positions: Vec<Vec3>,
    forces: Vec<Vec3>,
}

impl ForceSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, nodes: &mut NodeRegistry, edges: &EdgeRegistry, config: PhysicsConfig) {
        let ForceScratch {
            ids,
            kinds,
            positions,
            forces,
        } = &mut self.scratch;

        ids.clear();
        kinds.clear();
        positions.clear();
        for node in nodes.nodes() {
            if !node.kind.free_body() {
                continue;
            }
            ids.push(node.id.clone());
            kinds.push(node.kind);
            positions.push(node.position);
        }

        let count = ids.len();
        if count == 0 {
            return;
        }
        forces.clear();
        forces.resize(count, Vec3::ZERO);

        // Pinned nodes exert repulsion but accumulate nothing.
        for index in 0..count {
            if kinds[index].pinned() {
                continue;
            }
            for other in 0..count {
                if other == index {
                    continue;
                }
                forces[index] += repulsion_between(
                    positions[index],
                    positions[other],
                    config.repulsion,
                    config.epsilon,
                );
            }
        }

        let index_by_id = ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.as_str(), index))
            .collect::<HashMap<_, _>>();

        for edge in edges.all() {
            let (Some(&source), Some(&target)) = (
                index_by_id.get(edge.source_id.as_str()),
                index_by_id.get(edge.target_id.as_str()),
            ) else {
                continue;
            };
            let force = spring_between(
                positions[source],
                positions[target],
                config.spring,
                config.rest_length,
            );
            if !kinds[source].pinned() {
                forces[source] += force;
            }
            if !kinds[target].pinned() {
                forces[target] -= force;
            }
        }

        if let Some(router_pos) = nodes.router_position() {
            for index in 0..count {
                if kinds[index] == NodeKind::External {
                    forces[index] += outward_push(positions[index], router_pos, config.external_push);
                }
            }
        }

        for index in 0..count {
            let Some(node) = nodes.get_mut(&ids[index]) else {
                continue;
            };
            if kinds[index].pinned() {
                // The router is an immovable anchor, not a high-mass body.
                node.position = Vec3::ZERO;
                node.velocity = Vec3::ZERO;
                continue;
            }
            let velocity = (node.velocity + forces[index]) * config.damping;
            node.velocity = velocity;
            node.position += velocity;
        }
    }
}
