//! Cache Replacement Policies.
//!
//! Implements the algorithms for selecting victim ways in set-associative caches.
//! Policies read the per-line stamps kept by the cache ([`CacheLine::last_used`]
//! and [`CacheLine::inserted`]) and are only consulted for full sets.
//!
//! # Policies
//!
//! - `Fifo`: First-In, First-Out (oldest insertion stamp).
//! - `Lru`: Least Recently Used (oldest last-use stamp).
//! - `Random`: Random selection.
//!
//! Ties resolve to the lowest way index.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Random replacement policy.
pub mod random;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;

use super::CacheLine;
use crate::config::ReplacementPolicy as PolicyType;

/// Trait for cache replacement policies.
pub trait ReplacementPolicy: Send + Sync + std::fmt::Debug {
    /// Selects the way to evict from a full set.
    ///
    /// # Arguments
    ///
    /// * `set` - The lines of one set, way 0 first. Never empty.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn select_victim(&mut self, set: &[CacheLine]) -> usize;
}

/// Builds the boxed policy for a configured policy type.
///
/// `seed` only affects [`RandomPolicy`].
pub fn build(policy: PolicyType, seed: u64) -> Box<dyn ReplacementPolicy> {
    match policy {
        PolicyType::Lru => Box::new(LruPolicy),
        PolicyType::Fifo => Box::new(FifoPolicy),
        PolicyType::Random => Box::new(RandomPolicy::new(seed)),
    }
}

/// Index of the first way minimizing `key`.
pub(crate) fn first_min_by_key(set: &[CacheLine], key: impl Fn(&CacheLine) -> u64) -> usize {
    let mut victim = 0;
    let mut best = u64::MAX;
    for (way, line) in set.iter().enumerate() {
        let k = key(line);
        if k < best {
            best = k;
            victim = way;
        }
    }
    victim
}
