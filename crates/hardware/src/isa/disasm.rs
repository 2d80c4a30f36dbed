//! Instruction Disassembler.
//!
//! Renders a decoded [`Instruction`] back into canonical assembly text, with
//! `R`-prefixed registers and decimal immediates. Used for step logs and
//! diagnostics; the output decodes to the same instruction.

use std::fmt;

use crate::isa::instruction::Instruction;

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.mnemonic();
        match self {
            Self::Add { rd, rs1, rs2 } | Self::Sub { rd, rs1, rs2 } => {
                write!(f, "{m} R{rd}, R{rs1}, R{rs2}")
            }
            Self::Addi { rd, rs1, imm } => write!(f, "{m} R{rd}, R{rs1}, {imm}"),
            Self::Movi { rd, imm } => write!(f, "{m} R{rd}, {imm}"),
            Self::Lw { rd, base, offset } => write!(f, "{m} R{rd}, {offset}(R{base})"),
            Self::Sw { rs2, base, offset } => write!(f, "{m} R{rs2}, {offset}(R{base})"),
            Self::Beq { rs1, rs2, label } => write!(f, "{m} R{rs1}, R{rs2}, {label}"),
            Self::Jmp { label } => write!(f, "{m} {label}"),
            Self::Halt => f.write_str(m),
        }
    }
}
