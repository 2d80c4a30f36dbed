//! Program Tests.
//!
//! Verifies the label pass: labels bind to the index of the next instruction
//! (forward references included), comments and blank lines are skipped, and
//! branches to undeclared labels are rejected before anything executes.

use memsim_core::isa::{Instruction, Program};
use memsim_core::SimError;

#[test]
fn labels_bind_to_next_instruction() {
    let program = Program::parse(
        "// header\n\
         start:\n\
         MOVI R1, 1\n\
         \n\
         loop: ADDI R1, R1, 1  # bump\n\
         BEQ R1, R1, end\n\
         end:\n\
         HALT\n",
    )
    .unwrap();

    assert_eq!(program.len(), 4);
    assert_eq!(program.label("start"), Some(0));
    assert_eq!(program.label("loop"), Some(1));
    assert_eq!(program.label("end"), Some(3));
    assert_eq!(program.label("nope"), None);
    assert_eq!(program.get(3).unwrap().inst, Instruction::Halt);
    assert_eq!(program.get(1).unwrap().line, 5);
}

/// A trailing label points one past the last instruction.
#[test]
fn trailing_label() {
    let program = Program::parse("JMP out\nout:").unwrap();
    assert_eq!(program.label("out"), Some(1));
    assert_eq!(program.len(), 1);
}

#[test]
fn unknown_label_rejected() {
    let err = Program::parse("MOVI R1, 1\n\nJMP nowhere").unwrap_err();
    assert_eq!(
        err,
        SimError::UnknownLabel {
            label: "nowhere".into(),
            line: 3,
        }
    );
}

/// The first decoding error in source order wins.
#[test]
fn first_error_reported() {
    let err = Program::parse("MOVI R1, 1\nFOO\nADD R1").unwrap_err();
    assert_eq!(
        err,
        SimError::UnknownOpcode {
            opcode: "FOO".into(),
            line: 2,
        }
    );
}

#[test]
fn empty_program() {
    let program = Program::parse("// nothing\n\n").unwrap();
    assert!(program.is_empty());
    assert_eq!(program.labels().count(), 0);
}
