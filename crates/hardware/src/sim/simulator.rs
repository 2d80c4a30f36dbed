//! Simulator: the single entry point for driving the cache model.
//!
//! Owns the interpreter (and through it the memory hierarchy) together with the
//! replay state of a loaded address trace. Three ways of driving it coexist:
//! 1. **Live stepping:** [`Simulator::step_line`] executes one line of source text.
//! 2. **Program mode:** [`Simulator::load_program`], then [`Simulator::step`] or
//!    [`Simulator::run`].
//! 3. **Trace replay:** [`Simulator::load_trace`], then [`Simulator::step_trace`],
//!    [`Simulator::run_trace`], or [`Simulator::seek`].
//!
//! Seeking backward resets the whole hierarchy and replays the trace from the
//! start, so anything done outside the trace since it was loaded is discarded.

use crate::common::{AccessType, AddressRef, SimResult};
use crate::config::Config;
use crate::core::Cpu;
use crate::core::cpu::{Run, StepOutcome};
use crate::core::hierarchy::{AccessResult, MemorySystem};
use crate::core::units::cache::CacheLine;
use crate::core::units::power::EnergyTotals;
use crate::isa::Program;
use crate::sim::assembler::{Assembly, TraceAssembler};
use crate::sim::trace::{TraceOp, parse_trace};
use crate::stats::SimStats;

/// Top-level simulator: interpreter, hierarchy, and trace replay cursor.
#[derive(Debug)]
pub struct Simulator {
    config: Config,
    cpu: Cpu,
    trace: Vec<TraceOp>,
    cursor: usize,
    live_line: usize,
}

impl Simulator {
    /// Creates a simulator for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`](crate::common::SimError::Configuration)
    /// if `config` is invalid.
    pub fn new(config: Config) -> SimResult<Self> {
        let cpu = Cpu::new(&config)?;
        Ok(Self {
            config,
            cpu,
            trace: Vec::new(),
            cursor: 0,
            live_line: 0,
        })
    }

    /// Replaces the configuration and starts over with empty caches.
    ///
    /// A loaded program or trace stays loaded and is rewound. On error the
    /// simulator is left exactly as it was.
    pub fn configure(&mut self, config: Config) -> SimResult<()> {
        let mut cpu = Cpu::new(&config)?;
        if let Some(program) = self.cpu.program() {
            cpu.load_program(program.clone());
        }
        tracing::info!(
            l1 = config.l1.size_bytes,
            l2 = config.l2.size_bytes,
            voltage = config.power.voltage,
            "simulator reconfigured"
        );
        self.cpu = cpu;
        self.config = config;
        self.cursor = 0;
        self.live_line = 0;
        Ok(())
    }

    /// Returns caches, memory, registers, and statistics to their initial state.
    pub fn reset(&mut self) -> SimResult<()> {
        self.cpu.reset()?;
        self.cursor = 0;
        self.live_line = 0;
        tracing::info!("simulator reset");
        Ok(())
    }

    /// Executes one line of source text (instruction, label, or raw access).
    pub fn step_line(&mut self, line: &str) -> SimResult<StepOutcome> {
        self.live_line += 1;
        self.cpu.execute_line(self.live_line, line)
    }

    /// Performs one access directly against the hierarchy.
    pub fn access(
        &mut self,
        addr: impl Into<AddressRef>,
        kind: AccessType,
        value: Option<i32>,
    ) -> AccessResult {
        self.cpu.mem.access(addr, kind, value)
    }

    /// Decodes `source` and makes it the program for [`Simulator::step`].
    pub fn load_program(&mut self, source: &str) -> SimResult<()> {
        let program = Program::parse(source)?;
        self.cpu.load_program(program);
        Ok(())
    }

    /// Executes the next program instruction; `Ok(None)` once the program ends.
    pub fn step(&mut self) -> SimResult<Option<StepOutcome>> {
        self.cpu.step()
    }

    /// Runs the program up to the configured step cap.
    pub fn run(&mut self) -> SimResult<Run> {
        self.cpu.run(self.config.interpreter.max_steps)
    }

    /// Assembles `source` into an address trace without touching simulator state.
    pub fn assemble(&self, source: &str) -> SimResult<Assembly> {
        TraceAssembler::new()
            .with_max_steps(self.config.interpreter.max_steps)
            .assemble(source)
    }

    /// Parses `text` as an address trace and rewinds to its start with an empty hierarchy.
    ///
    /// # Returns
    ///
    /// The number of operations loaded.
    pub fn load_trace(&mut self, text: &str) -> SimResult<usize> {
        let ops = parse_trace(text)?;
        self.load_trace_ops(ops)?;
        Ok(self.trace.len())
    }

    /// Loads already parsed operations for replay.
    pub fn load_trace_ops(&mut self, ops: Vec<TraceOp>) -> SimResult<()> {
        tracing::info!(ops = ops.len(), "trace loaded");
        self.trace = ops;
        self.reset()
    }

    /// Replays the next trace operation.
    pub fn step_trace(&mut self) -> Option<AccessResult> {
        let op = self.trace.get(self.cursor)?;
        let result = self
            .cpu
            .mem
            .access(op.addr.clone(), op.kind, op.value);
        self.cursor += 1;
        Some(result)
    }

    /// Replays every remaining trace operation.
    pub fn run_trace(&mut self) -> Vec<AccessResult> {
        std::iter::from_fn(|| self.step_trace()).collect()
    }

    /// Moves the replay cursor so that exactly `step` operations have executed.
    ///
    /// Forward seeks replay the operations in between; backward seeks reset and
    /// replay from the start. `step` is clamped to the trace length.
    pub fn seek(&mut self, step: usize) -> SimResult<()> {
        let target = step.min(self.trace.len());
        if target < self.cursor {
            self.cpu.reset()?;
            self.cursor = 0;
        }
        while self.cursor < target {
            let _ = self.step_trace();
        }
        tracing::debug!(position = self.cursor, "seek");
        Ok(())
    }

    /// Number of trace operations replayed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Number of operations in the loaded trace.
    pub fn trace_len(&self) -> usize {
        self.trace.len()
    }

    /// The loaded trace.
    pub fn trace(&self) -> &[TraceOp] {
        &self.trace
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The interpreter.
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// The memory hierarchy.
    pub fn memory_system(&self) -> &MemorySystem {
        &self.cpu.mem
    }

    /// Running statistics.
    pub fn stats(&self) -> &SimStats {
        self.cpu.mem.stats()
    }

    /// Running energy totals.
    pub fn energy(&self) -> &EnergyTotals {
        self.cpu.mem.energy_totals()
    }

    /// Register values, register 0 first.
    pub fn registers(&self) -> &[i32] {
        self.cpu.regs.values()
    }

    /// Program counter.
    pub fn pc(&self) -> u32 {
        self.cpu.pc
    }

    /// Per-set snapshot of L1.
    pub fn l1_snapshot(&self) -> Vec<Vec<CacheLine>> {
        self.cpu.mem.l1_snapshot()
    }

    /// Per-set snapshot of L2.
    pub fn l2_snapshot(&self) -> Vec<Vec<CacheLine>> {
        self.cpu.mem.l2_snapshot()
    }
}
