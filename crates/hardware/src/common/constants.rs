//! Global simulator constants.
//!
//! This module defines constants shared across the simulator. It includes:
//! 1. **Address constants:** The 32-bit address mask and the symbol allocation base.
//! 2. **Instruction constants:** Instruction width and register-file sizes.
//! 3. **Timing constants:** The hit time and miss penalty used for AMAT.

/// Every address is masked to 32 bits before use.
pub const ADDRESS_MASK: u64 = 0xFFFF_FFFF;

/// First address handed out to symbolic variables.
pub const SYMBOL_BASE: u32 = 0x1000;

/// Initial program counter of the live interpreter.
pub const BASE_PC: u32 = 0x1000;

/// Width of one instruction in bytes; the PC advances by this after every step.
pub const INSTRUCTION_WIDTH: u32 = 4;

/// Register-file size of the trace assembler (`R0`..`R7`).
pub const ASSEMBLER_REGISTERS: usize = 8;

/// Register-file size of the live interpreter (`x0`..`x31`).
pub const INTERPRETER_REGISTERS: usize = 32;

/// Step cap for bounded program execution.
pub const MAX_STEPS: usize = 1000;

/// Hit time in cycles used for AMAT.
pub const HIT_TIME_CYCLES: f64 = 1.0;

/// Miss penalty in cycles used for AMAT.
pub const MISS_PENALTY_CYCLES: f64 = 100.0;
