//! Instruction Execution.
//!
//! This module implements the interpreter's execute step. It performs the following:
//! 1. **Line handling:** Comments, `label:` prefixes, instructions, and raw trace lines.
//! 2. **Execution:** Register arithmetic through the ALU, loads and stores through the
//!    memory hierarchy, and label-based control flow.
//! 3. **Architectural update:** Register 0 is re-zeroed and the PC advances by the
//!    instruction width (or to the branch target) after every instruction.
//!
//! A line that fails to decode or execute changes nothing, not even the label table.

use super::{Cpu, StepOutcome};
use crate::common::constants::INSTRUCTION_WIDTH;
use crate::common::{SimError, SimResult};
use crate::core::units::alu::{Alu, AluOp};
use crate::isa::Instruction;
use crate::isa::decode::{decode, split_label, starts_with_mnemonic, strip_comment};
use crate::sim::trace::TraceOp;

/// What a source line holds once comments and labels are removed.
enum LineBody {
    Empty,
    Instruction(Instruction),
    Access(TraceOp),
}

impl Cpu {
    /// Executes one line of source text in live mode.
    ///
    /// The line may hold a comment, a `label:` prefix, an instruction, or a raw
    /// trace access (`0x100`, `x = 5`, `Write 0x10 3`). Labels bind to the
    /// current PC. Raw accesses go straight to the hierarchy and do not move the PC.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-based line number used in errors
    /// * `raw` - The source text
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownOpcode`], [`SimError::MalformedLine`], or
    /// [`SimError::UnknownLabel`] for a branch to a label not yet seen.
    pub fn execute_line(&mut self, line: usize, raw: &str) -> SimResult<StepOutcome> {
        let text = strip_comment(raw);
        if text.is_empty() {
            return Ok(StepOutcome::Idle);
        }
        let (label, body) = split_label(line, text)?;
        let body = if body.is_empty() {
            LineBody::Empty
        } else if !starts_with_mnemonic(body) && TraceOp::looks_like_trace(body) {
            match TraceOp::parse_line(line, body)? {
                Some(op) => LineBody::Access(op),
                None => LineBody::Empty,
            }
        } else {
            LineBody::Instruction(decode(line, body)?)
        };

        // Bound before executing so `loop: JMP loop` resolves; undone on error.
        let previous = label.map(|label| (label, self.labels.insert(label.to_string(), self.pc)));

        let result = match body {
            LineBody::Empty => Ok(StepOutcome::Idle),
            LineBody::Access(op) => Ok(self.raw_access(&op)),
            LineBody::Instruction(inst) => self.execute(&inst, line),
        };

        match (&result, previous) {
            (Err(_), Some((label, Some(old)))) => {
                let _ = self.labels.insert(label.to_string(), old);
            }
            (Err(_), Some((label, None))) => {
                let _ = self.labels.remove(label);
            }
            (Ok(_), Some((label, _))) => tracing::trace!(label, "label bound"),
            _ => {}
        }
        result
    }

    /// Executes one decoded instruction.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownLabel`] if a taken branch or a jump names an unbound
    /// label; state is left untouched in that case.
    pub fn execute(&mut self, inst: &Instruction, line: usize) -> SimResult<StepOutcome> {
        let mut next_pc = self.pc.wrapping_add(INSTRUCTION_WIDTH);

        let outcome = match *inst {
            Instruction::Add { rd, rs1, rs2 } => self.alu_reg(AluOp::Add, rd, rs1, rs2),
            Instruction::Sub { rd, rs1, rs2 } => self.alu_reg(AluOp::Sub, rd, rs1, rs2),
            Instruction::Addi { rd, rs1, imm } => {
                let alu = Alu::execute(AluOp::Addi, self.regs.read(rs1), imm);
                self.regs.write(rd, alu.result);
                StepOutcome::Alu { alu }
            }
            Instruction::Movi { rd, imm } => {
                let alu = Alu::execute(AluOp::Movi, 0, imm);
                self.regs.write(rd, alu.result);
                StepOutcome::Alu { alu }
            }
            Instruction::Lw { rd, base, offset } => self.load_word(rd, base, offset),
            Instruction::Sw { rs2, base, offset } => self.store_word(rs2, base, offset),
            Instruction::Beq {
                rs1,
                rs2,
                ref label,
            } => {
                let alu = Alu::execute(AluOp::Compare, self.regs.read(rs1), self.regs.read(rs2));
                if alu.result != 0 {
                    next_pc = self.resolve_label(label, line)?;
                }
                StepOutcome::Alu { alu }
            }
            Instruction::Jmp { ref label } => {
                next_pc = self.resolve_label(label, line)?;
                let alu = Alu::execute(AluOp::Jump, self.pc as i32, next_pc as i32);
                StepOutcome::Alu { alu }
            }
            Instruction::Halt => {
                self.halted = true;
                StepOutcome::Alu {
                    alu: Alu::execute(AluOp::Halt, 0, 0),
                }
            }
        };

        self.regs.zero_hardwired();
        tracing::debug!(pc = self.pc, line, %inst, "executed");
        self.pc = next_pc;
        self.retired += 1;
        Ok(outcome)
    }

    /// `rd = rs1 <op> rs2`.
    fn alu_reg(&mut self, op: AluOp, rd: usize, rs1: usize, rs2: usize) -> StepOutcome {
        let alu = Alu::execute(op, self.regs.read(rs1), self.regs.read(rs2));
        self.regs.write(rd, alu.result);
        StepOutcome::Alu { alu }
    }

    fn resolve_label(&self, label: &str, line: usize) -> SimResult<u32> {
        self.label(label).ok_or_else(|| SimError::UnknownLabel {
            label: label.to_string(),
            line,
        })
    }
}
