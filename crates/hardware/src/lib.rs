//! Two-level cache hierarchy simulator library.
//!
//! This crate implements a teaching-oriented memory hierarchy simulator with the following:
//! 1. **Caches:** Configurable set-associative L1 and L2 with LRU, FIFO, or Random
//!    replacement, three-C miss classification, and dirty-bit write-back.
//! 2. **Energy:** Voltage-scaled static, dynamic, and miss-penalty energy, plus AMAT.
//! 3. **ISA:** A small load/store instruction set with labels and branches.
//! 4. **Interpreter:** Live line-by-line stepping and whole-program execution.
//! 5. **Simulation:** Address traces, the program-to-trace assembler, replay with
//!    seeking, configuration, and statistics.

/// Common types and constants (addresses, geometry, registers, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Interpreter, memory hierarchy, and functional units.
pub mod core;
/// Instruction set (model, decoding, disassembly, programs).
pub mod isa;
/// Trace format, assembler, loader, and the simulator facade.
pub mod sim;
/// Backing store.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Simulator error type and result alias.
pub use crate::common::{SimError, SimResult};
/// Interpreter; owns the memory hierarchy.
pub use crate::core::Cpu;
/// Memory hierarchy and its per-access result.
pub use crate::core::{AccessResult, MemorySystem};
/// Top-level simulator facade.
pub use crate::sim::Simulator;
