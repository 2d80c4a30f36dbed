//! Instruction Set Architecture (ISA) Definitions.
//!
//! A small load/store instruction set used to drive the cache hierarchy:
//! register arithmetic, immediate moves, word loads and stores, and
//! label-based control flow.
//!
//! # Instructions
//!
//! * `ADD rd, rs1, rs2` / `SUB rd, rs1, rs2` / `ADDI rd, rs1, imm`
//! * `MOVI rd, imm`
//! * `LW rd, offset(base)` / `SW rs2, offset(base)`
//! * `BEQ rs1, rs2, label` / `JMP label` / `HALT`

/// Text decoding of single assembly lines.
pub mod decode;

/// Disassembly (`Display` for [`Instruction`]).
pub mod disasm;

/// Instruction model.
pub mod instruction;

/// Whole-program decoding and label resolution.
pub mod program;

pub use instruction::Instruction;
pub use program::{Program, SourceInstruction};
