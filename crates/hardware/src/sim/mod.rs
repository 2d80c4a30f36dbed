//! Simulation drivers and input handling.
//!
//! Provides the address-trace format, the program-to-trace assembler, file
//! loading, and the [`Simulator`] facade that ties them to the hierarchy.

/// Program-to-trace assembler with bounded execution.
pub mod assembler;

/// Trace, program, and configuration file loading.
pub mod loader;

/// Top-level simulator facade.
pub mod simulator;

/// Address-trace line format.
pub mod trace;

pub use assembler::{Assembly, TraceAssembler};
pub use simulator::Simulator;
pub use trace::TraceOp;
