//! Interpreter Tests.
//!
//! Covers both ways of driving the interpreter:
//! 1. **Live mode:** one line at a time through `Simulator::step_line`, with labels
//!    bound to the PC at which they are seen and raw trace lines accepted.
//! 2. **Program mode:** a whole program loaded up front, so branches can jump
//!    forward and loops run to completion or to the step cap.

use memsim_core::common::MissType;
use memsim_core::config::Config;
use memsim_core::core::cpu::StepOutcome;
use memsim_core::core::units::alu::{AluOp, AluResult};
use memsim_core::SimError;
use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

/// Counts R1 up to 3, then halts. Eleven instructions execute.
const COUNT_TO_THREE: &str = "\
MOVI R1, 0
MOVI R2, 3
loop:
ADDI R1, R1, 1
BEQ R1, R2, done
JMP loop
done:
HALT
";

fn alu(outcome: &StepOutcome) -> AluResult {
    *outcome.alu().expect("instruction should report an ALU record")
}

// ══════════════════════════════════════════════════════════
// 1. Register arithmetic
// ══════════════════════════════════════════════════════════

/// MOVI, ADD, SUB, and ADDI update registers and advance the PC by 4.
#[test]
fn arithmetic_and_pc() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.sim.pc(), 0x1000);

    let movi = ctx.line("MOVI x1, 5");
    assert_eq!(alu(&movi).op, AluOp::Movi);
    let add = ctx.line("ADD x2, x1, x1");
    assert_eq!(
        alu(&add),
        AluResult {
            op: AluOp::Add,
            operand_a: 5,
            operand_b: 5,
            result: 10,
        }
    );
    let _ = ctx.line("SUB x3, x1, x2");
    let _ = ctx.line("ADDI x4, x3, 0x10");

    assert_eq!((ctx.reg(1), ctx.reg(2), ctx.reg(3), ctx.reg(4)), (5, 10, -5, 11));
    assert_eq!(ctx.sim.pc(), 0x1010);
    assert_eq!(ctx.sim.cpu().retired(), 4);
}

/// Register 0 ignores writes.
#[test]
fn x0_stays_zero() {
    let mut ctx = TestContext::new();
    let _ = ctx.lines("MOVI x1, 4\nADDI x0, x1, 3\nMOVI x0, 9");
    assert_eq!(ctx.reg(0), 0);
}

/// Register numbers wrap modulo the register-file size.
#[test]
fn register_numbers_wrap() {
    let mut ctx = TestContext::new();
    let _ = ctx.line("MOVI x33, 4");
    assert_eq!(ctx.reg(1), 4);

    let mut small = Config::default();
    small.interpreter.register_count = 8;
    let mut ctx = TestContext::with_config(small);
    let _ = ctx.line("MOVI R9, 3");
    assert_eq!(ctx.sim.registers().len(), 8);
    assert_eq!(ctx.reg(1), 3);
}

/// Arithmetic wraps at 32 bits.
#[test]
fn arithmetic_wraps() {
    let mut ctx = TestContext::new();
    let _ = ctx.lines("MOVI x1, 0x7FFFFFFF\nADDI x2, x1, 1");
    assert_eq!(ctx.reg(2), i32::MIN);
}

// ══════════════════════════════════════════════════════════
// 2. Loads and stores
// ══════════════════════════════════════════════════════════

/// SW misses compulsorily; the following LW hits and loads the stored value.
#[test]
fn store_then_load() {
    let mut ctx = TestContext::new();
    let _ = ctx.lines("MOVI x2, 0x100\nMOVI x1, 42");

    let sw = ctx.line("SW x1, 0(x2)");
    let access = sw.access().unwrap();
    assert!(!access.is_hit);
    assert_eq!(access.miss_type, MissType::Compulsory);
    assert_eq!(access.address, 0x100);
    assert_eq!(alu(&sw).op, AluOp::AddressGen);
    assert_eq!(alu(&sw).result, 0x100);

    let lw = ctx.line("LW x3, 0(x2)");
    assert!(lw.access().unwrap().is_hit);
    assert_eq!(ctx.reg(3), 42);
    assert_eq!(ctx.sim.pc(), 0x1010);
}

/// A load that misses in L1 leaves its destination unchanged.
#[test]
fn load_miss_keeps_destination() {
    let mut ctx = TestContext::new();
    let _ = ctx.line("MOVI x3, 7");
    let lw = ctx.line("LW x3, 0x200(x0)");
    assert!(!lw.access().unwrap().is_hit);
    assert_eq!(ctx.reg(3), 7);
}

/// A load hit on a word never written loads 0.
#[test]
fn load_hit_on_unwritten_word_loads_zero() {
    let mut ctx = TestContext::new();
    let _ = ctx.lines("MOVI x3, 7\nLW x4, 0x200(x0)\nLW x3, 0x204(x0)");
    assert_eq!(ctx.reg(3), 0);
}

/// Negative offsets are applied to the base register.
#[test]
fn negative_offset() {
    let mut ctx = TestContext::new();
    let _ = ctx.line("MOVI x2, 0x108");
    let sw = ctx.line("SW x0, -8(x2)");
    assert_eq!(sw.access().unwrap().address, 0x100);
}

// ══════════════════════════════════════════════════════════
// 3. Raw trace lines
// ══════════════════════════════════════════════════════════

/// A bare address is a read reported as a `MEM` step; the PC does not move.
#[test]
fn raw_address_line() {
    let mut ctx = TestContext::new();
    let out = ctx.line("0x100");
    assert_eq!(alu(&out).op, AluOp::Mem);
    assert_eq!(alu(&out).result, 0x100);
    assert_eq!(out.access().unwrap().address, 0x100);
    assert_eq!(ctx.sim.pc(), 0x1000);
    assert_eq!(ctx.sim.cpu().retired(), 0);
}

/// `name = value` writes a symbol; `Write addr value` writes a literal.
#[test]
fn raw_write_lines() {
    let mut ctx = TestContext::new();
    let sym = ctx.line("x = 5");
    let access = sym.access().unwrap();
    assert_eq!(access.address, 0x1000);
    assert_eq!(access.data, Some(5));

    let lit = ctx.line("Write 0x10 3");
    assert_eq!(lit.access().unwrap().data, Some(3));
    assert_eq!(ctx.sim.stats().writes, 2);
}

// ══════════════════════════════════════════════════════════
// 4. Labels and control flow (live)
// ══════════════════════════════════════════════════════════

/// Labels bind to the current PC; a taken BEQ jumps back to it.
#[test]
fn live_backward_branch() {
    let mut ctx = TestContext::new();
    let _ = ctx.line("MOVI x1, 1");
    let _ = ctx.line("loop: ADDI x1, x1, 1");
    assert_eq!(ctx.sim.cpu().label("loop"), Some(0x1004));

    let taken = ctx.line("BEQ x0, x0, loop");
    assert_eq!(alu(&taken).result, 1);
    assert_eq!(ctx.sim.pc(), 0x1004);

    let not_taken = ctx.line("BEQ x1, x0, loop");
    assert_eq!(alu(&not_taken).result, 0);
    assert_eq!(ctx.sim.pc(), 0x1008);
}

/// A label on its own line binds to the next instruction's PC.
#[test]
fn label_only_line() {
    let mut ctx = TestContext::new();
    let _ = ctx.line("MOVI x1, 1");
    assert_eq!(ctx.line("top:"), StepOutcome::Idle);
    assert_eq!(ctx.sim.cpu().label("top"), Some(0x1004));
}

/// Comments and blank lines do nothing.
#[test]
fn comments_and_blanks_are_idle() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.line(""), StepOutcome::Idle);
    assert_eq!(ctx.line("// note"), StepOutcome::Idle);
    assert_eq!(ctx.line("   # note"), StepOutcome::Idle);
    assert_eq!(ctx.sim.pc(), 0x1000);
}

/// JMP to a label not yet seen fails and changes nothing.
#[test]
fn live_unknown_label() {
    let mut ctx = TestContext::new();
    let _ = ctx.line("MOVI x1, 1");
    let err = ctx.sim.step_line("JMP later").unwrap_err();
    assert_eq!(
        err,
        SimError::UnknownLabel {
            label: "later".into(),
            line: 2,
        }
    );
    assert_eq!(ctx.sim.pc(), 0x1004);
    assert_eq!(ctx.sim.cpu().retired(), 1);

    let err = ctx.sim.step_line("here: JMP nowhere").unwrap_err();
    assert!(matches!(err, SimError::UnknownLabel { line: 3, .. }));
    assert_eq!(ctx.sim.pc(), 0x1004);
    assert!(ctx.sim.cpu().label("here").is_none());
}

/// A failing line restores the label's earlier binding.
#[test]
fn failed_line_keeps_previous_label() {
    let mut ctx = TestContext::new();
    let _ = ctx.line("here: MOVI x1, 1");
    assert!(ctx.sim.step_line("here: JMP nowhere").is_err());
    assert_eq!(ctx.sim.cpu().label("here"), Some(0x1000));
}

/// A jump to the label declared on the same line lands on itself.
#[test]
fn self_referencing_jump() {
    let mut ctx = TestContext::new();
    let _ = ctx.line("MOVI x1, 1");
    let _ = ctx.line("spin: JMP spin");
    assert_eq!(ctx.sim.pc(), 0x1004);
    assert_eq!(ctx.sim.cpu().label("spin"), Some(0x1004));
}

/// A not-taken branch never resolves its label.
#[test]
fn not_taken_branch_ignores_unknown_label() {
    let mut ctx = TestContext::new();
    let _ = ctx.line("MOVI x1, 1");
    let _ = ctx.line("BEQ x1, x0, nowhere");
    assert_eq!(ctx.sim.pc(), 0x1008);
}

// ══════════════════════════════════════════════════════════
// 5. Rejected lines
// ══════════════════════════════════════════════════════════

/// An unknown opcode is rejected without touching any state, label included.
#[test]
fn unknown_opcode_changes_nothing() {
    let mut ctx = TestContext::new();
    let err = ctx.sim.step_line("bad: FOO x1, x2").unwrap_err();
    assert_eq!(
        err,
        SimError::UnknownOpcode {
            opcode: "FOO".into(),
            line: 1,
        }
    );
    assert_eq!(ctx.sim.pc(), 0x1000);
    assert_eq!(ctx.sim.cpu().label("bad"), None);
    assert_eq!(ctx.sim.stats().accesses, 0);
}

/// Wrong operand counts are malformed lines.
#[test]
fn malformed_instruction() {
    let mut ctx = TestContext::new();
    let err = ctx.sim.step_line("ADD x1, x2").unwrap_err();
    assert!(matches!(err, SimError::MalformedLine { line: 1, .. }), "{err:?}");
}

// ══════════════════════════════════════════════════════════
// 6. Program mode
// ══════════════════════════════════════════════════════════

/// A counting loop runs to HALT.
#[test]
fn program_runs_to_halt() {
    let mut ctx = TestContext::new();
    ctx.sim.load_program(COUNT_TO_THREE).unwrap();
    assert_eq!(ctx.sim.cpu().label("loop"), Some(0x1008));
    assert_eq!(ctx.sim.cpu().label("done"), Some(0x1014));

    let run = ctx.sim.run().unwrap();
    assert_eq!(run.steps.len(), 11);
    assert_eq!(run.diagnostic, None);
    assert_eq!(ctx.reg(1), 3);
    assert!(ctx.sim.cpu().is_halted());
    assert_eq!(ctx.sim.step().unwrap(), None);
}

/// Loads and stores in a program go through the hierarchy.
#[test]
fn program_memory_traffic() {
    let mut ctx = TestContext::new();
    ctx.sim
        .load_program("MOVI x1, 9\nSW x1, 0x40(x0)\nLW x2, 0x40(x0)\nHALT")
        .unwrap();
    let run = ctx.sim.run().unwrap();
    let accesses: Vec<bool> = run
        .steps
        .iter()
        .filter_map(|s| s.access().map(|a| a.is_hit))
        .collect();
    assert_eq!(accesses, vec![false, true]);
    assert_eq!(ctx.reg(2), 9);
    assert_eq!(ctx.sim.stats().accesses, 2);
}

/// Falling off the end stops the run without HALT.
#[test]
fn program_ends_without_halt() {
    let mut ctx = TestContext::new();
    ctx.sim.load_program("MOVI x1, 1\nMOVI x2, 2").unwrap();
    let run = ctx.sim.run().unwrap();
    assert_eq!(run.steps.len(), 2);
    assert_eq!(run.diagnostic, None);
    assert!(!ctx.sim.cpu().is_halted());
}

/// An infinite loop stops at the cap and reports it as a diagnostic.
#[test]
fn infinite_loop_hits_step_cap() {
    let mut ctx = TestContext::new();
    ctx.sim.load_program("top:\nJMP top").unwrap();
    let run = ctx.sim.run().unwrap();
    assert_eq!(run.steps.len(), 1000);
    assert_eq!(
        run.diagnostic,
        Some(SimError::ExecutionLimitExceeded { limit: 1000 })
    );
}

/// The cap follows the configuration.
#[test]
fn step_cap_is_configurable() {
    let mut config = Config::default();
    config.interpreter.max_steps = 10;
    let mut ctx = TestContext::with_config(config);
    ctx.sim.load_program("top:\nADDI x1, x1, 1\nJMP top").unwrap();
    let run = ctx.sim.run().unwrap();
    assert_eq!(run.steps.len(), 10);
    assert_eq!(ctx.reg(1), 5);
    assert!(run.diagnostic.is_some());
}

/// Unknown labels are caught when the program is loaded.
#[test]
fn program_unknown_label_rejected_on_load() {
    let mut ctx = TestContext::new();
    let err = ctx
        .sim
        .load_program("MOVI x1, 1\nBEQ x1, x0, missing")
        .unwrap_err();
    assert_eq!(
        err,
        SimError::UnknownLabel {
            label: "missing".into(),
            line: 2,
        }
    );
    assert!(ctx.sim.cpu().program().is_none());
}

/// Reset clears registers and statistics and restarts the loaded program.
#[test]
fn reset_restarts_program() {
    let mut ctx = TestContext::new();
    ctx.sim.load_program(COUNT_TO_THREE).unwrap();
    let _ = ctx.sim.run().unwrap();
    ctx.sim.reset().unwrap();

    assert_eq!(ctx.reg(1), 0);
    assert_eq!(ctx.sim.pc(), 0x1000);
    assert_eq!(ctx.sim.stats().accesses, 0);
    assert!(ctx.sim.cpu().has_next());

    let run = ctx.sim.run().unwrap();
    assert_eq!(run.steps.len(), 11);
}
