//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the cache line that has not been accessed for the longest time.
//! Every hit or fill stamps the line with the global access clock, so the victim is
//! the way holding the smallest stamp.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()` is O(W) where W is the associativity
//! - **Space Complexity:** one 64-bit stamp per line, kept by the cache
//! - **Best Case:** Working sets that fit in the set with good temporal locality
//! - **Worst Case:** Cyclic scans one block larger than the set (thrashing)

use super::{CacheLine, ReplacementPolicy, first_min_by_key};

/// LRU Policy. Stateless: recency lives in the lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl ReplacementPolicy for LruPolicy {
    /// Returns the first way with the oldest last-use stamp.
    fn select_victim(&mut self, set: &[CacheLine]) -> usize {
        first_min_by_key(set, CacheLine::last_used)
    }
}
