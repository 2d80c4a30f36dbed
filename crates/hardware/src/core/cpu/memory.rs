//! Memory access handling.
//!
//! Loads, stores, and raw trace accesses issued by the interpreter. Effective
//! addresses are `base + offset` with 32-bit wrap-around.

use super::{Cpu, StepOutcome};
use crate::core::units::alu::{Alu, AluOp};
use crate::sim::trace::TraceOp;

impl Cpu {
    /// `LW rd, offset(base)`.
    ///
    /// The fetched value reaches `rd` only on an L1 hit; an unwritten word loads 0.
    pub(super) fn load_word(&mut self, rd: usize, base: usize, offset: i32) -> StepOutcome {
        let alu = Alu::execute(AluOp::AddressGen, self.regs.read(base), offset);
        let access = self.mem.read(alu.result as u32);
        if access.is_hit {
            self.regs.write(rd, access.data.unwrap_or(0));
        }
        StepOutcome::Memory { access, alu }
    }

    /// `SW rs2, offset(base)`.
    pub(super) fn store_word(&mut self, rs2: usize, base: usize, offset: i32) -> StepOutcome {
        let value = self.regs.read(rs2);
        let alu = Alu::execute(AluOp::AddressGen, self.regs.read(base), offset);
        let access = self.mem.write(alu.result as u32, value);
        StepOutcome::Memory { access, alu }
    }

    /// Performs a trace operation directly, reporting it as a `MEM` step.
    pub fn raw_access(&mut self, op: &TraceOp) -> StepOutcome {
        let access = self.mem.access(op.addr.clone(), op.kind, op.value);
        let alu = Alu::execute(AluOp::Mem, 0, access.address as i32);
        StepOutcome::Memory { access, alu }
    }
}
