//! Memory access types.
//!
//! This module defines the classification of memory accesses used throughout the simulator.
//! These types are used for the following:
//! 1. **Cache bookkeeping:** Writes set the dirty bit and replace the line's datum.
//! 2. **Statistics tracking:** Reads and writes are counted separately.
//! 3. **Miss classification:** The three-C taxonomy reported for L1 misses.

use std::fmt;

use serde::Serialize;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AccessType {
    /// Data read access (loads and bare trace addresses).
    Read,

    /// Data write access (stores and `Write` trace lines).
    ///
    /// Marks the target line dirty.
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub fn is_write(self) -> bool {
        self == Self::Write
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("Read"),
            Self::Write => f.write_str("Write"),
        }
    }
}

/// Cause of an L1 miss.
///
/// Only L1 misses are classified; L2 misses are counted but carry no cause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MissType {
    /// The access hit.
    #[default]
    None,
    /// The set still had an invalid way (first use of that slot).
    Compulsory,
    /// The level has a single set and all its ways were occupied.
    Capacity,
    /// The level has several sets and the target set was full.
    Conflict,
}

impl fmt::Display for MissType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Compulsory => f.write_str("Compulsory"),
            Self::Capacity => f.write_str("Capacity"),
            Self::Conflict => f.write_str("Conflict"),
        }
    }
}
