//! Trace Assembler Tests.
//!
//! The assembler runs a program on an eight-register file without a cache and
//! records every load and store. These tests check the emitted trace, the
//! values carried by stores (including values loaded back from earlier
//! stores), control flow, and the step cap that guards against infinite loops.

use memsim_core::common::MissType;
use memsim_core::config::Config;
use memsim_core::sim::{TraceAssembler, TraceOp};
use memsim_core::{SimError, Simulator};
use pretty_assertions::assert_eq;

fn assemble(source: &str) -> memsim_core::sim::Assembly {
    TraceAssembler::new().assemble(source).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Straight-line programs
// ══════════════════════════════════════════════════════════

/// A store and a load of the same address become a write and a read.
#[test]
fn store_then_load() {
    let asm = assemble("MOVI R1, 5\nMOVI R2, 0x100\nSW R1, 0(R2)\nLW R3, 0(R2)");
    assert_eq!(asm.text(), "Write 0x100 5\n0x100");
    assert_eq!(asm.steps, 4);
    assert_eq!(asm.diagnostic, None);
}

/// Replaying that trace: the write misses compulsorily, the read hits.
#[test]
fn replay_store_then_load() {
    let asm = assemble("MOVI R1, 5\nMOVI R2, 0x100\nSW R1, 0(R2)\nLW R3, 0(R2)");
    let mut sim = Simulator::new(Config::default()).unwrap();
    sim.load_trace_ops(asm.trace).unwrap();
    let results = sim.run_trace();

    assert_eq!(results.len(), 2);
    assert!(!results[0].is_hit);
    assert_eq!(results[0].miss_type, MissType::Compulsory);
    assert!(results[1].is_hit);
    assert_eq!(results[1].data, Some(5));
}

/// A load picks up the value of an earlier store to the same address.
#[test]
fn load_returns_stored_value() {
    let asm = assemble("MOVI R1, 7\nMOVI R2, 0x40\nSW R1, 0(R2)\nLW R3, 0(R2)\nSW R3, 4(R2)");
    assert_eq!(asm.trace.last(), Some(&TraceOp::write(0x44u32, 7)));
}

/// Unwritten words load 0.
#[test]
fn unwritten_load_is_zero() {
    let asm = assemble("MOVI R3, 9\nLW R3, 0x80(R0)\nSW R3, 0x84(R0)");
    assert_eq!(asm.text(), "0x80\nWrite 0x84 0");
}

/// Register 0 stays zero even when targeted.
#[test]
fn r0_hardwired() {
    let asm = assemble("MOVI R0, 9\nSW R0, 0(R0)");
    assert_eq!(asm.text(), "Write 0x0 0");
}

/// Comments, blank lines, and trailing comments are ignored.
#[test]
fn comments_ignored() {
    let asm = assemble("// header\n\nMOVI R1, 1 // one\nSW R1, 0x20(R0) # store");
    assert_eq!(asm.text(), "Write 0x20 1");
}

/// Register numbers wrap modulo eight.
#[test]
fn eight_register_file() {
    let asm = assemble("MOVI R9, 3\nSW R1, 0(R0)");
    assert_eq!(asm.text(), "Write 0x0 3");
}

// ══════════════════════════════════════════════════════════
// 2. Control flow
// ══════════════════════════════════════════════════════════

/// A counted loop stores four consecutive words.
#[test]
fn counted_loop() {
    let asm = assemble(
        "MOVI R1, 0\n\
         MOVI R2, 0x100\n\
         MOVI R3, 4\n\
         loop:\n\
         SW R1, 0(R2)\n\
         ADDI R2, R2, 4\n\
         ADDI R1, R1, 1\n\
         BEQ R1, R3, end\n\
         JMP loop\n\
         end:\n\
         HALT",
    );
    assert_eq!(
        asm.text(),
        "Write 0x100 0\nWrite 0x104 1\nWrite 0x108 2\nWrite 0x10C 3"
    );
    assert_eq!(asm.diagnostic, None);
}

/// HALT stops execution immediately.
#[test]
fn halt_stops() {
    let asm = assemble("HALT\nSW R0, 0(R0)");
    assert!(asm.trace.is_empty());
    assert_eq!(asm.steps, 1);
    assert_eq!(asm.diagnostic, None);
}

/// SUB and ADD feed addresses like any register.
#[test]
fn computed_addresses() {
    let asm = assemble("MOVI R1, 0x30\nMOVI R2, 0x10\nSUB R3, R1, R2\nADD R4, R3, R2\nLW R5, 0(R3)\nLW R5, 0(R4)");
    assert_eq!(asm.text(), "0x20\n0x30");
}

// ══════════════════════════════════════════════════════════
// 3. Limits and errors
// ══════════════════════════════════════════════════════════

/// An infinite loop stops at 1000 steps with the partial trace and a diagnostic.
#[test]
fn infinite_loop_is_capped() {
    let asm = assemble("loop:\nLW R1, 0(R0)\nJMP loop");
    assert_eq!(asm.steps, 1000);
    assert_eq!(asm.trace.len(), 500);
    assert_eq!(
        asm.diagnostic,
        Some(SimError::ExecutionLimitExceeded { limit: 1000 })
    );
}

/// A program that finishes exactly at the cap is not flagged.
#[test]
fn finishing_at_cap_is_not_flagged() {
    let asm = TraceAssembler::new()
        .with_max_steps(2)
        .assemble("MOVI R1, 1\nSW R1, 0(R0)")
        .unwrap();
    assert_eq!(asm.steps, 2);
    assert_eq!(asm.diagnostic, None);
}

/// Branches to undeclared labels abort assembly.
#[test]
fn unknown_label_aborts() {
    let err = TraceAssembler::new().assemble("JMP nowhere").unwrap_err();
    assert_eq!(
        err,
        SimError::UnknownLabel {
            label: "nowhere".into(),
            line: 1,
        }
    );
}

/// Unknown mnemonics abort assembly.
#[test]
fn unknown_opcode_aborts() {
    let err = TraceAssembler::new().assemble("NOP").unwrap_err();
    assert!(matches!(err, SimError::UnknownOpcode { line: 1, .. }));
}

/// The simulator's assembler follows the configured cap.
#[test]
fn simulator_uses_configured_cap() {
    let mut config = Config::default();
    config.interpreter.max_steps = 20;
    let sim = Simulator::new(config).unwrap();
    let asm = sim.assemble("loop:\nSW R0, 0(R0)\nJMP loop").unwrap();
    assert_eq!(asm.steps, 20);
    assert_eq!(asm.trace.len(), 10);
    assert_eq!(
        asm.diagnostic,
        Some(SimError::ExecutionLimitExceeded { limit: 20 })
    );
}
