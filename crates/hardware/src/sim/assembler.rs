//! Trace Assembler.
//!
//! Turns an assembly program into a flat address trace by running it without
//! a cache. It performs:
//! 1. **Label pass:** [`Program::parse`] binds labels to instruction indices and
//!    rejects branches to undeclared labels.
//! 2. **Bounded execution:** Runs on an eight-register file (`R0`..`R7`) for at most
//!    the configured step count. Every `LW` emits a read and every `SW` a write.
//! 3. **Diagnostics:** Hitting the cap keeps the partial trace and attaches
//!    [`SimError::ExecutionLimitExceeded`].
//!
//! Stores are remembered in a private memory image so a later `LW` of the same
//! address loads the stored value; unwritten words load 0.

use crate::common::constants::{ASSEMBLER_REGISTERS, MAX_STEPS};
use crate::common::{RegisterFile, SimError, SimResult};
use crate::core::units::alu::{Alu, AluOp};
use crate::isa::{Instruction, Program};
use crate::sim::trace::{TraceOp, render_trace};
use crate::soc::memory::MemoryImage;

/// Trace produced by the assembler.
#[derive(Clone, Debug, PartialEq)]
pub struct Assembly {
    /// Memory operations in execution order.
    pub trace: Vec<TraceOp>,
    /// Instructions executed.
    pub steps: usize,
    /// [`SimError::ExecutionLimitExceeded`] if execution was cut short.
    pub diagnostic: Option<SimError>,
}

impl Assembly {
    /// The trace in text form, one operation per line.
    pub fn text(&self) -> String {
        render_trace(&self.trace)
    }
}

/// Two-pass assembler from programs to address traces.
#[derive(Clone, Debug)]
pub struct TraceAssembler {
    max_steps: usize,
    register_count: usize,
}

impl Default for TraceAssembler {
    fn default() -> Self {
        Self {
            max_steps: MAX_STEPS,
            register_count: ASSEMBLER_REGISTERS,
        }
    }
}

impl TraceAssembler {
    /// Creates an assembler with the default cap and register file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the step cap.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Assembles and runs `source`.
    ///
    /// # Errors
    ///
    /// Decoding errors and [`SimError::UnknownLabel`] abort assembly; nothing is
    /// returned for the program in that case.
    pub fn assemble(&self, source: &str) -> SimResult<Assembly> {
        let program = Program::parse(source)?;
        Ok(self.run(&program))
    }

    /// Runs an already decoded program.
    pub fn run(&self, program: &Program) -> Assembly {
        let mut regs = RegisterFile::new(self.register_count);
        let mut memory = MemoryImage::new();
        let mut trace = Vec::new();
        let mut index = 0;
        let mut steps = 0;

        while steps < self.max_steps {
            let Some(si) = program.get(index) else {
                break;
            };
            let mut next = index + 1;
            match si.inst {
                Instruction::Add { rd, rs1, rs2 } => {
                    let alu = Alu::execute(AluOp::Add, regs.read(rs1), regs.read(rs2));
                    regs.write(rd, alu.result);
                }
                Instruction::Sub { rd, rs1, rs2 } => {
                    let alu = Alu::execute(AluOp::Sub, regs.read(rs1), regs.read(rs2));
                    regs.write(rd, alu.result);
                }
                Instruction::Addi { rd, rs1, imm } => {
                    let alu = Alu::execute(AluOp::Addi, regs.read(rs1), imm);
                    regs.write(rd, alu.result);
                }
                Instruction::Movi { rd, imm } => regs.write(rd, imm),
                Instruction::Lw { rd, base, offset } => {
                    let addr = effective_address(&regs, base, offset);
                    trace.push(TraceOp::read(addr));
                    regs.write(rd, memory.read(addr).unwrap_or(0));
                }
                Instruction::Sw { rs2, base, offset } => {
                    let addr = effective_address(&regs, base, offset);
                    let value = regs.read(rs2);
                    trace.push(TraceOp::write(addr, value));
                    memory.write(addr, value);
                }
                Instruction::Beq {
                    rs1,
                    rs2,
                    ref label,
                } => {
                    if regs.read(rs1) == regs.read(rs2) {
                        next = program.label(label).unwrap_or(program.len());
                    }
                }
                Instruction::Jmp { ref label } => {
                    next = program.label(label).unwrap_or(program.len());
                }
                Instruction::Halt => next = program.len(),
            }
            regs.zero_hardwired();
            index = next;
            steps += 1;
        }

        let diagnostic = (index < program.len()).then(|| {
            tracing::warn!(
                limit = self.max_steps,
                "assembly execution limit reached (infinite loop?)"
            );
            SimError::ExecutionLimitExceeded {
                limit: self.max_steps,
            }
        });
        tracing::info!(steps, accesses = trace.len(), "program assembled to trace");

        Assembly {
            trace,
            steps,
            diagnostic,
        }
    }
}

fn effective_address(regs: &RegisterFile, base: usize, offset: i32) -> u32 {
    Alu::execute(AluOp::AddressGen, regs.read(base), offset).result as u32
}
