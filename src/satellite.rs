//! Orbit placement for `child` nodes. A satellite is a deterministic
//! function of its parent's position and its angular slot, recomputed every
//! tick after the force pass; no velocity or damping applies.

use std::f32::consts::{FRAC_PI_4, TAU};

use glam::Vec3;

use crate::graph::{NodeKind, NodeRegistry, OrbitSlot};

/// Z offset of the distinguished external-port satellite.
const FIXED_SLOT_DEPTH: f32 = 3.0;

pub struct SatelliteLayout {
    orbit_radius: f32,
    scratch: Vec<(String, String, OrbitSlot)>,
}

impl SatelliteLayout {
    pub fn new(orbit_radius: f32) -> Self {
        Self {
            orbit_radius,
            scratch: Vec::new(),
        }
    }

    /// Reposition every child around its parent. A child whose parent is
    /// missing keeps its last known position for the tick; it is not an
    /// error and resumes orbiting if the parent reappears.
    pub fn step(&mut self, nodes: &mut NodeRegistry) {
        self.scratch.clear();
        for node in nodes.nodes() {
            if node.kind != NodeKind::Child {
                continue;
            }
            let (Some(parent_id), Some(slot)) = (&node.parent_id, node.orbit) else {
                continue;
            };
            self.scratch.push((node.id.clone(), parent_id.clone(), slot));
        }

        for (child_key, parent_id, slot) in &self.scratch {
            let Some(parent_pos) = nodes.get(parent_id).map(|parent| parent.position) else {
                continue;
            };
            if let Some(child) = nodes.get_mut(child_key) {
                child.position = parent_pos + orbit_offset(*slot, self.orbit_radius);
                child.velocity = Vec3::ZERO;
            }
        }
    }
}

fn orbit_offset(slot: OrbitSlot, orbit_radius: f32) -> Vec3 {
    let (angle, depth) = if slot.fixed_angle {
        (FRAC_PI_4, FIXED_SLOT_DEPTH)
    } else {
        (TAU * slot.index as f32 / slot.total.max(1) as f32, 0.0)
    };
    Vec3::new(angle.cos() * orbit_radius, angle.sin() * orbit_radius, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{UpdateOptions, child_id};
    use crate::snapshot::NodeSnapshot;

    fn registry_with_parent(id: &str) -> NodeRegistry {
        let mut nodes = NodeRegistry::new();
        nodes.update(
            &[NodeSnapshot::new(id, Some("device"))],
            UpdateOptions::default(),
        );
        nodes
    }

    #[test]
    fn satellites_are_a_deterministic_function_of_the_parent() {
        let mut nodes = registry_with_parent("host");
        nodes.spawn_children("host", &[80, 443]);
        let mut layout = SatelliteLayout::new(3.0);

        layout.step(&mut nodes);
        let parent_pos = nodes.get("host").unwrap().position;
        let first = nodes.get(&child_id("host", 80)).unwrap().position;
        let second = nodes.get(&child_id("host", 443)).unwrap().position;

        assert!((first - (parent_pos + Vec3::new(3.0, 0.0, 0.0))).length() < 1e-4);
        let half_turn = Vec3::new((TAU / 2.0).cos() * 3.0, (TAU / 2.0).sin() * 3.0, 0.0);
        assert!((second - (parent_pos + half_turn)).length() < 1e-4);

        // Re-running with unchanged inputs reproduces identical positions.
        layout.step(&mut nodes);
        assert_eq!(nodes.get(&child_id("host", 80)).unwrap().position, first);
        assert_eq!(nodes.get(&child_id("host", 443)).unwrap().position, second);
    }

    #[test]
    fn satellites_follow_a_moving_parent() {
        let mut nodes = registry_with_parent("host");
        nodes.spawn_children("host", &[22]);
        let mut layout = SatelliteLayout::new(3.0);
        layout.step(&mut nodes);

        nodes.get_mut("host").unwrap().position = Vec3::new(10.0, -4.0, 2.0);
        layout.step(&mut nodes);

        let child = nodes.get(&child_id("host", 22)).unwrap();
        assert!((child.position - Vec3::new(13.0, -4.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn orphaned_satellites_keep_their_last_position() {
        let mut nodes = registry_with_parent("host");
        nodes.spawn_children("host", &[22]);
        let mut layout = SatelliteLayout::new(3.0);
        layout.step(&mut nodes);
        let before = nodes.get(&child_id("host", 22)).unwrap().position;

        // Parent vanishes from the next snapshot; the child is not removed
        // and is skipped by the layout pass.
        nodes.update(&[], UpdateOptions::default());
        assert!(!nodes.contains("host"));
        layout.step(&mut nodes);

        assert_eq!(nodes.get(&child_id("host", 22)).unwrap().position, before);
    }

    #[test]
    fn fixed_slot_sits_above_the_sibling_ring() {
        let mut nodes = NodeRegistry::new();
        let mut entry = NodeSnapshot::new("gw", Some("router"));
        entry
            .metadata
            .insert("open_external_port".to_owned(), serde_json::Value::from(443));
        nodes.update(&[entry], UpdateOptions::default());
        nodes.spawn_children("gw", &[]);

        let mut layout = SatelliteLayout::new(3.0);
        layout.step(&mut nodes);

        let external = nodes.get("external-port-443").unwrap();
        let expected = Vec3::new(
            FRAC_PI_4.cos() * 3.0,
            FRAC_PI_4.sin() * 3.0,
            FIXED_SLOT_DEPTH,
        );
        assert!((external.position - expected).length() < 1e-4);
    }
}
