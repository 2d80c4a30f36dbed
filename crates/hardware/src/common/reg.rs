//! Integer register file.
//!
//! This module provides the `RegisterFile` struct shared by the live interpreter
//! (32 registers, `x0`..`x31`) and the trace assembler (8 registers, `R0`..`R7`).
//! It provides:
//! 1. **Storage:** A fixed-size array of 32-bit signed registers.
//! 2. **Invariant Enforcement:** Register 0 is hardwired to zero.
//! 3. **Safe Indexing:** Register numbers wrap modulo the file size.

use serde::Serialize;

/// Fixed-size integer register file with a hardwired zero register.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterFile {
    regs: Vec<i32>,
}

impl RegisterFile {
    /// Creates a register file of `size` registers, all zero.
    ///
    /// A size of zero is bumped to one so indexing stays total.
    pub fn new(size: usize) -> Self {
        Self {
            regs: vec![0; size.max(1)],
        }
    }

    /// Number of registers.
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    /// Always `false`; a register file holds at least the zero register.
    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Reads register `idx` (modulo the file size). Register 0 always reads 0.
    #[inline]
    pub fn read(&self, idx: usize) -> i32 {
        let idx = idx % self.regs.len();
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes register `idx` (modulo the file size). Writes to register 0 are ignored.
    #[inline]
    pub fn write(&mut self, idx: usize, val: i32) {
        let idx = idx % self.regs.len();
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Forces register 0 back to zero.
    #[inline]
    pub fn zero_hardwired(&mut self) {
        self.regs[0] = 0;
    }

    /// Raw register values, index 0 first.
    pub fn values(&self) -> &[i32] {
        &self.regs
    }

    /// Clears every register.
    pub fn reset(&mut self) {
        self.regs.fill(0);
    }
}
