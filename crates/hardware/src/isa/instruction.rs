//! Instruction model for the teaching ISA.
//!
//! Register operands are stored as written; the register file reduces them
//! modulo its size when they are read or written.

use serde::Serialize;

/// One decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "UPPERCASE")]
pub enum Instruction {
    /// `ADD rd, rs1, rs2`
    Add {
        /// Destination register.
        rd: usize,
        /// First source register.
        rs1: usize,
        /// Second source register.
        rs2: usize,
    },
    /// `SUB rd, rs1, rs2`
    Sub {
        /// Destination register.
        rd: usize,
        /// Minuend register.
        rs1: usize,
        /// Subtrahend register.
        rs2: usize,
    },
    /// `ADDI rd, rs1, imm`
    Addi {
        /// Destination register.
        rd: usize,
        /// Source register.
        rs1: usize,
        /// Immediate addend.
        imm: i32,
    },
    /// `MOVI rd, imm`
    Movi {
        /// Destination register.
        rd: usize,
        /// Value loaded.
        imm: i32,
    },
    /// `LW rd, offset(base)`
    Lw {
        /// Destination register.
        rd: usize,
        /// Base address register.
        base: usize,
        /// Byte offset from the base.
        offset: i32,
    },
    /// `SW rs2, offset(base)`
    Sw {
        /// Register holding the value stored.
        rs2: usize,
        /// Base address register.
        base: usize,
        /// Byte offset from the base.
        offset: i32,
    },
    /// `BEQ rs1, rs2, label`
    Beq {
        /// First compared register.
        rs1: usize,
        /// Second compared register.
        rs2: usize,
        /// Branch target.
        label: String,
    },
    /// `JMP label`
    Jmp {
        /// Jump target.
        label: String,
    },
    /// `HALT`
    Halt,
}

impl Instruction {
    /// Upper-case mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Add { .. } => "ADD",
            Self::Sub { .. } => "SUB",
            Self::Addi { .. } => "ADDI",
            Self::Movi { .. } => "MOVI",
            Self::Lw { .. } => "LW",
            Self::Sw { .. } => "SW",
            Self::Beq { .. } => "BEQ",
            Self::Jmp { .. } => "JMP",
            Self::Halt => "HALT",
        }
    }

    /// Label this instruction may transfer control to.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Beq { label, .. } | Self::Jmp { label } => Some(label),
            _ => None,
        }
    }

    /// Returns `true` for `LW` and `SW`.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Lw { .. } | Self::Sw { .. })
    }
}
