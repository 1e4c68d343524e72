//! Deterministic randomness for the layout pipeline.
//!
//! Per-node streams are seeded from a hash of the node id, so repeated runs over an
//! identical graph reproduce identical seeds regardless of component or sweep order.

use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub(crate) struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// Stream seeded from a node identifier.
    pub(crate) fn for_node(id: &str) -> Self {
        let mut hasher = rustc_hash::FxHasher::default();
        id.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Map to [0, 1) with 53 bits of precision.
    pub(crate) fn next_f64_unit(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }
}
