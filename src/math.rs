use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Three components in `[-1, 1]`, derived deterministically from the id hash.
/// Recreating a node with the same id reproduces the same jitter.
pub(crate) fn stable_triple(id: &str) -> (f32, f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    const MASK: u64 = 0x1f_ffff;
    let x = ((hash & MASK) as f32 / MASK as f32) * 2.0 - 1.0;
    let y = (((hash >> 21) & MASK) as f32 / MASK as f32) * 2.0 - 1.0;
    let z = (((hash >> 42) & MASK) as f32 / MASK as f32) * 2.0 - 1.0;
    (x, y, z)
}

/// `[-1, 1]` to `[0, 1]`.
pub(crate) fn unit(value: f32) -> f32 {
    value * 0.5 + 0.5
}
