//! Wire records consumed from the network collaborator.
//!
//! The backend polls the LAN (ARP scan, traceroute, port scans) and serves
//! the result as JSON. [`parse_network_payload`] decodes that payload
//! tolerantly: the envelope must be valid JSON, but individual malformed
//! entries are skipped with a diagnostic and never abort the batch.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct NodeSnapshot {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Optional upstream position. Only honored when the registry is updated
    /// with `preserve_positions` off; stored positions win otherwise.
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    /// Everything else the backend sends (label, color, role, scan results).
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl NodeSnapshot {
    pub fn new(id: impl Into<String>, kind: Option<&str>) -> Self {
        Self {
            id: id.into(),
            kind: kind.map(str::to_owned),
            position: None,
            metadata: Map::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EdgeSnapshot {
    pub source: String,
    pub target: String,
}

/// One observed packet flow, presentation-sized by `size`.
#[derive(Clone, Debug, Deserialize)]
pub struct TrafficEvent {
    pub src: String,
    pub dst: String,
    #[serde(default)]
    pub size: f32,
}

/// Result of an out-of-scope port scan, fed into
/// [`NodeRegistry::spawn_children`](crate::NodeRegistry::spawn_children).
#[derive(Clone, Debug, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub ports: Vec<u16>,
}

/// One full listing of nodes and edges received at one point in time.
#[derive(Clone, Debug, Default)]
pub struct NetworkSnapshot {
    /// Monotonic sequence number, when the backend provides one. Guards
    /// against a stale in-flight response overwriting a newer one.
    pub seq: Option<u64>,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

pub fn parse_network_payload(raw: &str) -> Result<NetworkSnapshot> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON network payload")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("unexpected JSON type for network payload"))?;

    let seq = object.get("seq").and_then(Value::as_u64);

    let mut nodes = Vec::new();
    if let Some(entries) = object.get("nodes").and_then(Value::as_array) {
        for entry in entries {
            match NodeSnapshot::deserialize(entry) {
                Ok(node) => nodes.push(node),
                Err(error) => log::warn!("skipping malformed node entry: {error}"),
            }
        }
    }

    let mut edges = Vec::new();
    if let Some(entries) = object.get("edges").and_then(Value::as_array) {
        for entry in entries {
            match EdgeSnapshot::deserialize(entry) {
                Ok(edge) => edges.push(edge),
                Err(error) => log::warn!("skipping malformed edge entry: {error}"),
            }
        }
    }

    Ok(NetworkSnapshot { seq, nodes, edges })
}
