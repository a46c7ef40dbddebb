//! Integration tests driving the engine the way the render loop does:
//! ingest polled snapshots, tick, read positions, drain removal queues.

use glam::Vec3;
use netorrery::{
    NetworkSnapshot, NodeKind, TrafficEvent, UpdateOptions, World, WorldConfig, child_id, edge_key,
    parse_network_payload,
};

fn backend_payload() -> &'static str {
    r#"{
        "nodes": [
            {"id": "My Ship", "type": "ship", "label": "Explorer Ship", "color": "blue"},
            {"id": "192.168.1.1", "type": "router", "label": "Router/Gateway", "color": "orange"},
            {"id": "192.168.1.23", "type": "device", "label": "Local Device", "color": "green"},
            {"id": "8.8.8.8", "type": "external", "label": "AS15169 (Google LLC)", "color": "red"}
        ],
        "edges": [
            {"source": "My Ship", "target": "192.168.1.1"},
            {"source": "192.168.1.1", "target": "192.168.1.23"},
            {"source": "192.168.1.1", "target": "8.8.8.8"}
        ]
    }"#
}

#[test]
fn full_pipeline_from_payload_to_stable_layout() {
    let snapshot = parse_network_payload(backend_payload()).unwrap();
    let mut world = World::default();
    assert!(world.apply_snapshot(&snapshot, UpdateOptions::default()));

    assert_eq!(world.node_count(), 4);
    assert_eq!(world.edge_count(), 3);

    for _ in 0..200 {
        world.tick();
    }

    // Router pinned, everything else finite.
    let router = world.node("192.168.1.1").unwrap();
    assert_eq!(router.kind, NodeKind::Router);
    assert_eq!(router.position, Vec3::ZERO);
    for node in world.nodes() {
        assert!(node.position.is_finite());
        assert!(node.velocity.is_finite());
    }

    // Edges track the relaxed endpoint positions.
    for edge in world.edges() {
        let source = world.node(&edge.source_id).unwrap();
        let target = world.node(&edge.target_id).unwrap();
        assert_eq!(edge.source_pos, source.position);
        assert_eq!(edge.target_pos, target.position);
    }
}

#[test]
fn node_removal_cascades_to_edges_via_drains() {
    let snapshot = parse_network_payload(backend_payload()).unwrap();
    let mut world = World::default();
    world.apply_snapshot(&snapshot, UpdateOptions::default());

    let shrunk = NetworkSnapshot {
        seq: None,
        nodes: snapshot
            .nodes
            .iter()
            .filter(|node| node.id != "192.168.1.23")
            .cloned()
            .collect(),
        edges: snapshot
            .edges
            .iter()
            .filter(|edge| edge.target != "192.168.1.23")
            .cloned()
            .collect(),
    };
    world.apply_snapshot(&shrunk, UpdateOptions::default());

    assert_eq!(world.drain_removed_nodes(), vec!["192.168.1.23".to_owned()]);
    assert_eq!(
        world.drain_removed_edges(),
        vec![edge_key("192.168.1.1", "192.168.1.23")]
    );
    assert_eq!(world.edge_count(), 2);
}

#[test]
fn scan_results_orbit_and_survive_polling() {
    let snapshot = parse_network_payload(backend_payload()).unwrap();
    let mut world = World::default();
    world.apply_snapshot(&snapshot, UpdateOptions::default());

    assert_eq!(world.spawn_children("192.168.1.23", &[22, 80, 443]), 3);
    world.tick();

    let parent_pos = world.node("192.168.1.23").unwrap().position;
    let child = world.node(&child_id("192.168.1.23", 22)).unwrap();
    assert!((child.position - parent_pos).length() < 3.0 + 1e-3);

    // Children outlive every subsequent poll until removed explicitly.
    world.apply_snapshot(&snapshot, UpdateOptions::default());
    assert!(world.node(&child_id("192.168.1.23", 80)).is_some());

    assert_eq!(world.remove_children("192.168.1.23"), 3);
    assert!(world.node(&child_id("192.168.1.23", 80)).is_none());
}

#[test]
fn traffic_markers_complete_and_release_drawables() {
    let snapshot = parse_network_payload(backend_payload()).unwrap();
    let mut world = World::new(WorldConfig {
        traffic_step: 0.25,
        ..WorldConfig::default()
    });
    world.apply_snapshot(&snapshot, UpdateOptions::default());

    let marker_id = world
        .record_traffic(&TrafficEvent {
            src: "192.168.1.23".to_owned(),
            dst: "192.168.1.1".to_owned(),
            size: 900.0,
        })
        .unwrap();

    for _ in 0..3 {
        world.tick();
        assert_eq!(world.traffic_markers().len(), 1);
        assert!(world.traffic_markers()[0].progress < 1.0);
    }
    world.tick();
    assert!(world.traffic_markers().is_empty());
    assert_eq!(world.drain_expired_traffic(), vec![marker_id]);
}

#[test]
fn stale_snapshots_are_rejected_by_sequence_number() {
    let mut newer = parse_network_payload(backend_payload()).unwrap();
    newer.seq = Some(9);
    let mut world = World::default();
    assert!(world.apply_snapshot(&newer, UpdateOptions::default()));

    let mut stale = NetworkSnapshot {
        seq: Some(4),
        nodes: Vec::new(),
        edges: Vec::new(),
    };
    assert!(!world.apply_snapshot(&stale, UpdateOptions::default()));
    assert_eq!(world.node_count(), 4);

    // Unsequenced snapshots keep the original last-completed-wins behavior.
    stale.seq = None;
    assert!(world.apply_snapshot(&stale, UpdateOptions::default()));
    assert_eq!(world.node_count(), 0);
}
