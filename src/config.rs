/// Tuning constants for one [`ForceSimulator`](crate::ForceSimulator) tick.
#[derive(Clone, Copy, Debug)]
pub struct PhysicsConfig {
    /// Velocity multiplier applied after force accumulation, per tick.
    pub damping: f32,
    /// Inverse-square pair repulsion constant.
    pub repulsion: f32,
    /// Hooke constant for edge springs.
    pub spring: f32,
    /// Spring rest length.
    pub rest_length: f32,
    /// Magnitude of the outward bias applied to external nodes.
    pub external_push: f32,
    /// Added to pair distances to guard the zero-distance singularity.
    pub epsilon: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            repulsion: 20.0,
            spring: 0.01,
            rest_length: 40.0,
            external_push: 0.01,
            epsilon: 0.1,
        }
    }
}

/// Edge removal policy for [`EdgeRegistry::update`](crate::EdgeRegistry::update).
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgePolicy {
    /// When set, edges absent from a snapshot are kept instead of removed.
    /// Trades staleness for visual stability when the backend's snapshots
    /// briefly omit an edge. Edges with a removed endpoint are still dropped.
    pub retain_missing: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct WorldConfig {
    pub physics: PhysicsConfig,
    pub edges: EdgePolicy,
    /// Distance between a child satellite and its parent.
    pub orbit_radius: f32,
    /// Per-tick progress increment for traffic markers.
    pub traffic_step: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            edges: EdgePolicy::default(),
            orbit_radius: 3.0,
            traffic_step: 0.05,
        }
    }
}
