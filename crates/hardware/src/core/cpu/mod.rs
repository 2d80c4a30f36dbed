//! CPU Core Definition and Initialization.
//!
//! This module defines the `Cpu` structure, the interpreter for the teaching ISA.
//! It coordinates the following:
//! 1. **State Management:** Register file, program counter, label table, halt flag.
//! 2. **Memory Hierarchy:** Owns the [`MemorySystem`] that loads and stores go through.
//! 3. **Live mode:** One source line per call ([`Cpu::execute_line`]); labels are
//!    bound to the PC at which they are seen.
//! 4. **Program mode:** A loaded [`Program`] is fetched by PC ([`Cpu::step`],
//!    [`Cpu::run`]), so branches and jumps change what executes next.

/// Instruction execution and control flow.
pub mod execution;

/// Load/store handling and raw trace accesses.
pub mod memory;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::common::constants::INSTRUCTION_WIDTH;
use crate::common::{RegisterFile, SimError, SimResult};
use crate::config::Config;
use crate::core::hierarchy::{AccessResult, MemorySystem};
use crate::core::units::alu::AluResult;
use crate::isa::Program;

/// Result of executing one line or instruction.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    /// A load, store, or raw trace access went through the hierarchy.
    Memory {
        /// Outcome of the access.
        access: AccessResult,
        /// Address generation (or `MEM` for raw accesses).
        alu: AluResult,
    },
    /// A register-only instruction.
    Alu {
        /// The ALU evaluation.
        alu: AluResult,
    },
    /// Nothing executed (blank, comment, or label-only line).
    Idle,
}

impl StepOutcome {
    /// The memory access, if one happened.
    pub fn access(&self) -> Option<&AccessResult> {
        match self {
            Self::Memory { access, .. } => Some(access),
            _ => None,
        }
    }

    /// The ALU record, if an instruction executed.
    pub fn alu(&self) -> Option<&AluResult> {
        match self {
            Self::Memory { alu, .. } | Self::Alu { alu } => Some(alu),
            Self::Idle => None,
        }
    }
}

/// Outcome of a bounded run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Run {
    /// Every step executed, in order.
    pub steps: Vec<StepOutcome>,
    /// [`SimError::ExecutionLimitExceeded`] if the program was cut short.
    #[serde(serialize_with = "serialize_diagnostic")]
    pub diagnostic: Option<SimError>,
}

fn serialize_diagnostic<S: serde::Serializer>(
    diag: &Option<SimError>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match diag {
        Some(e) => s.collect_str(e),
        None => s.serialize_none(),
    }
}

/// Interpreter state: registers, PC, labels, and the memory hierarchy.
#[derive(Debug)]
pub struct Cpu {
    /// Integer registers; register 0 reads as zero.
    pub regs: RegisterFile,
    /// Program counter.
    pub pc: u32,
    /// Cache hierarchy and backing store.
    pub mem: MemorySystem,
    base_pc: u32,
    labels: BTreeMap<String, u32>,
    program: Option<Program>,
    halted: bool,
    retired: u64,
}

impl Cpu {
    /// Creates an interpreter with an empty hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] if `config` is invalid.
    pub fn new(config: &Config) -> SimResult<Self> {
        let mem = MemorySystem::new(config)?;
        Ok(Self {
            regs: RegisterFile::new(config.interpreter.register_count),
            pc: config.interpreter.base_pc,
            mem,
            base_pc: config.interpreter.base_pc,
            labels: BTreeMap::new(),
            program: None,
            halted: false,
            retired: 0,
        })
    }

    /// Clears registers, caches, memory, and statistics and rewinds the PC.
    ///
    /// A loaded program stays loaded and restarts from its first instruction.
    pub fn reset(&mut self) -> SimResult<()> {
        self.mem.reset()?;
        self.regs.reset();
        self.retired = 0;
        self.rewind();
        Ok(())
    }

    /// Installs `program` for [`Cpu::step`] and rewinds the PC to its start.
    ///
    /// Registers and cache state are kept.
    pub fn load_program(&mut self, program: Program) {
        tracing::info!(instructions = program.len(), "program loaded");
        self.program = Some(program);
        self.rewind();
    }

    fn rewind(&mut self) {
        self.pc = self.base_pc;
        self.halted = false;
        let base = self.base_pc;
        self.labels = match &self.program {
            Some(program) => program
                .labels()
                .map(|(name, index)| (name.to_string(), pc_at(base, index)))
                .collect(),
            None => BTreeMap::new(),
        };
    }

    /// Program index addressed by the current PC.
    fn current_index(&self) -> usize {
        (self.pc.wrapping_sub(self.base_pc) / INSTRUCTION_WIDTH) as usize
    }

    /// Returns `true` while the loaded program has an instruction at the PC.
    pub fn has_next(&self) -> bool {
        !self.halted
            && self
                .program
                .as_ref()
                .is_some_and(|p| self.current_index() < p.len())
    }

    /// Whether `HALT` has executed since the last rewind.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Number of instructions executed since the last reset.
    pub fn retired(&self) -> u64 {
        self.retired
    }

    /// The loaded program, if any.
    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// PC a label is bound to.
    pub fn label(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }

    /// All known labels, ordered by name.
    pub fn labels(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.labels.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Executes the loaded program's instruction at the PC.
    ///
    /// Returns `Ok(None)` when there is no program, after `HALT`, or once the
    /// PC leaves the program.
    pub fn step(&mut self) -> SimResult<Option<StepOutcome>> {
        if !self.has_next() {
            return Ok(None);
        }
        let Some(si) = self
            .program
            .as_ref()
            .and_then(|p| p.get(self.current_index()))
            .cloned()
        else {
            return Ok(None);
        };
        self.execute(&si.inst, si.line).map(Some)
    }

    /// Executes the loaded program for at most `max_steps` instructions.
    ///
    /// Stopping at the cap while instructions remain is not an error: the
    /// steps executed so far come back with an
    /// [`SimError::ExecutionLimitExceeded`] diagnostic.
    pub fn run(&mut self, max_steps: usize) -> SimResult<Run> {
        let mut steps = Vec::new();
        while steps.len() < max_steps {
            match self.step()? {
                Some(outcome) => steps.push(outcome),
                None => {
                    return Ok(Run {
                        steps,
                        diagnostic: None,
                    });
                }
            }
        }
        let diagnostic = self.has_next().then(|| {
            tracing::warn!(limit = max_steps, pc = self.pc, "execution limit reached");
            SimError::ExecutionLimitExceeded { limit: max_steps }
        });
        Ok(Run { steps, diagnostic })
    }

    /// The memory hierarchy.
    pub fn memory(&self) -> &MemorySystem {
        &self.mem
    }
}

/// PC of the instruction at `index` in a program starting at `base`.
fn pc_at(base: u32, index: usize) -> u32 {
    base.wrapping_add((index as u32).wrapping_mul(INSTRUCTION_WIDTH))
}
