//! # Unit Components
//!
//! This module serves as the central hub for the unit tests. Its layout mirrors
//! the crate: shared types, configuration, the core (units, hierarchy,
//! interpreter), the ISA, the simulation drivers, and the backing store.




/// Unit tests for the instruction set.
///
/// This module aggregates tests for:
/// - Line decoding and error reporting.
/// - Disassembler formatting.
/// - Program label resolution.
pub mod isa;



/// Unit tests for simulation statistics verification.
///
/// This module contains tests that ensure the [`SimStats`](memsim_core::stats::SimStats)
/// structure correctly tracks hit rates, miss breakdowns, AMAT, and energy.
pub mod stats_verification;
