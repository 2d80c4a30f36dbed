//! Core simulator implementation.
//!
//! This module contains the instruction interpreter, the two-level memory
//! hierarchy it drives, and the functional units both are built from.

/// Instruction interpreter (registers, PC, labels, program execution).
pub mod cpu;

/// L1/L2/main-memory orchestration.
pub mod hierarchy;

/// Functional units (ALU, cache level, energy model).
pub mod units;

pub use self::cpu::Cpu;
pub use self::hierarchy::{AccessResult, MemorySystem};
