//! Functional units.
//!
//! The building blocks of the simulator: the integer ALU used by the
//! interpreter, the set-associative cache level used for both L1 and L2, and
//! the energy model charged on every access.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Set-associative cache level with replacement policies.
pub mod cache;

/// Voltage-scaled cache energy model.
pub mod power;
