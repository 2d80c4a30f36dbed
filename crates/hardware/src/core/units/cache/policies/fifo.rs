//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the oldest cache line in a set, regardless of how recently
//! it was accessed. Lines carry an insertion stamp that is written on fill and
//! never refreshed by hits, which keeps FIFO distinct from LRU.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()` is O(W)
//! - **Space Complexity:** one insertion stamp per line, kept by the cache
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with a hot line that was filled early

use super::{CacheLine, ReplacementPolicy, first_min_by_key};

/// FIFO Policy. Stateless: insertion order lives in the lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoPolicy;

impl ReplacementPolicy for FifoPolicy {
    /// Returns the first way with the oldest insertion stamp.
    fn select_victim(&mut self, set: &[CacheLine]) -> usize {
        first_min_by_key(set, CacheLine::inserted)
    }
}
