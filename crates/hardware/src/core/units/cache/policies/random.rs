//! Random Replacement Policy.
//!
//! This policy evicts a random cache line from the set. It uses a xorshift
//! generator so runs are reproducible for a given seed.

use super::{CacheLine, ReplacementPolicy};

/// Random Policy state.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    /// Internal state for the pseudo-random number generator.
    state: u64,
}

impl RandomPolicy {
    /// Creates a new Random policy instance.
    ///
    /// A zero seed would lock xorshift at zero, so it is replaced with 1.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl ReplacementPolicy for RandomPolicy {
    /// Generates a pseudo-random number and maps it to a valid way index.
    fn select_victim(&mut self, set: &[CacheLine]) -> usize {
        (self.next() % set.len() as u64) as usize
    }
}
