//! System components below the caches.
//!
//! Holds the backing store the hierarchy fills from and writes back to.

/// Sparse main memory image.
pub mod memory;

pub use memory::MemoryImage;
