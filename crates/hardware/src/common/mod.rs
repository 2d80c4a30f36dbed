//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Address Types:** Address references, per-level geometry, and the symbol table.
//! 2. **Constants:** Address width, interpreter parameters, and AMAT timing.
//! 3. **Memory Access:** Read/write classification and the three-C miss taxonomy.
//! 4. **Error Handling:** The simulator error type and result alias.
//! 5. **Register Management:** The integer register file.

/// Address references, geometry (address codec), and symbol allocation.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access and miss type definitions.
pub mod data;

/// Error types.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use addr::{AddressRef, Decomposed, Geometry, SymbolTable};
pub use data::{AccessType, MissType};
pub use error::{SimError, SimResult};
pub use reg::RegisterFile;
