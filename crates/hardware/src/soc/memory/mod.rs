//! Main Memory (backing store).
//!
//! This module implements the backing store behind the cache hierarchy. It provides:
//! 1. **Sparse storage:** Only written addresses are stored; untouched reads yield `None`.
//! 2. **Block reads:** Range queries used to fill a cache line.
//! 3. **Snapshots:** Ordered iteration for display and tests.

use std::collections::BTreeMap;

use serde::Serialize;

/// Sparse word-addressed backing store.
///
/// Grows only on write; the cache hierarchy decides when writes arrive here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryImage {
    words: BTreeMap<u32, i32>,
}

impl MemoryImage {
    /// Creates an empty memory image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the value last written to `addr`.
    pub fn read(&self, addr: u32) -> Option<i32> {
        self.words.get(&addr).copied()
    }

    /// Writes `value` to `addr`.
    pub fn write(&mut self, addr: u32, value: i32) {
        let _ = self.words.insert(addr, value);
    }

    /// Every stored word in `[start, end]`.
    pub fn block(&self, start: u32, end: u32) -> BTreeMap<u32, i32> {
        self.words
            .range(start..=end)
            .map(|(&a, &v)| (a, v))
            .collect()
    }

    /// All stored words, ordered by address.
    pub fn iter(&self) -> impl Iterator<Item = (u32, i32)> + '_ {
        self.words.iter().map(|(&a, &v)| (a, v))
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Forgets every stored word.
    pub fn clear(&mut self) {
        self.words.clear();
    }
}
