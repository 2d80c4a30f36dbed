//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used by the interpreter. It covers the
//! register arithmetic of the mini ISA (`ADD`, `SUB`, `ADDI`, `MOVI`), the branch
//! comparison of `BEQ`, and the effective-address addition performed by `LW`/`SW`.
//! All arithmetic wraps at 32 bits.
//!
//! Every evaluation yields an [`AluResult`] record so callers can display the
//! operation, its operands, and its result.

use std::fmt;

use serde::Serialize;

/// Operation performed by the ALU for one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AluOp {
    /// `rd = rs1 + rs2`
    #[serde(rename = "ADD")]
    Add,
    /// `rd = rs1 - rs2`
    #[serde(rename = "SUB")]
    Sub,
    /// `rd = rs1 + imm`
    #[serde(rename = "ADDI")]
    Addi,
    /// `rd = imm`
    #[serde(rename = "MOVI")]
    Movi,
    /// Equality comparison for `BEQ`; result is 1 when taken.
    #[serde(rename = "BEQ")]
    Compare,
    /// Unconditional jump; result is the target PC.
    #[serde(rename = "JMP")]
    Jump,
    /// Program stop.
    #[serde(rename = "HALT")]
    Halt,
    /// Effective address `base + offset` for a load or store.
    #[serde(rename = "ADD (Addr)")]
    AddressGen,
    /// A raw trace line executed as a direct memory access.
    #[serde(rename = "MEM")]
    Mem,
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Addi => "ADDI",
            Self::Movi => "MOVI",
            Self::Compare => "BEQ",
            Self::Jump => "JMP",
            Self::Halt => "HALT",
            Self::AddressGen => "ADD (Addr)",
            Self::Mem => "MEM",
        };
        f.write_str(s)
    }
}

/// Record of one ALU evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AluResult {
    /// Operation performed.
    pub op: AluOp,
    /// First operand.
    pub operand_a: i32,
    /// Second operand.
    pub operand_b: i32,
    /// Result written back (or the effective address / target).
    pub result: i32,
}

impl fmt::Display for AluResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {}",
            self.op, self.operand_a, self.operand_b, self.result
        )
    }
}

/// Arithmetic Logic Unit for the interpreter's integer operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alu;

impl Alu {
    /// Executes an ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The operation to perform
    /// * `a`  - First operand (register value, base, or current PC)
    /// * `b`  - Second operand (register value, immediate, offset, or target)
    ///
    /// # Examples
    ///
    /// ```
    /// use memsim_core::core::units::alu::{Alu, AluOp};
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, 2, 3).result, 5);
    /// assert_eq!(Alu::execute(AluOp::Sub, i32::MIN, 1).result, i32::MAX);
    /// assert_eq!(Alu::execute(AluOp::Compare, 7, 7).result, 1);
    /// ```
    pub fn execute(op: AluOp, a: i32, b: i32) -> AluResult {
        let result = match op {
            AluOp::Add | AluOp::Addi | AluOp::AddressGen => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::Movi | AluOp::Jump | AluOp::Mem => b,
            AluOp::Compare => i32::from(a == b),
            AluOp::Halt => 0,
        };
        AluResult {
            op,
            operand_a: a,
            operand_b: b,
            result,
        }
    }
}
