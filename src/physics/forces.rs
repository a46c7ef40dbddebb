use glam::Vec3;

/// Inverse-square pair repulsion. Coincident points yield the zero vector
/// rather than NaN; freshly created nodes can legitimately share a position.
pub(super) fn repulsion_between(
    point_a: Vec3,
    point_b: Vec3,
    repulsion: f32,
    epsilon: f32,
) -> Vec3 {
    let delta = point_a - point_b;
    let guarded = delta.length() + epsilon;
    delta.normalize_or_zero() * (repulsion / (guarded * guarded))
}

/// Hooke spring along an edge, positive toward the target when stretched
/// beyond the rest length.
pub(super) fn spring_between(source: Vec3, target: Vec3, spring: f32, rest_length: f32) -> Vec3 {
    let delta = target - source;
    delta.normalize_or_zero() * (spring * (delta.length() - rest_length))
}

/// Constant-magnitude push away from the anchor, used to bias external
/// endpoints outward from the router. Not a physical force; it has no
/// distance falloff.
pub(super) fn outward_push(position: Vec3, anchor: Vec3, strength: f32) -> Vec3 {
    (position - anchor).normalize_or_zero() * strength
}
