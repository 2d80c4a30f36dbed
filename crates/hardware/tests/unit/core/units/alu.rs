//! ALU Tests.
//!
//! Verifies the operation records produced for each interpreter operation,
//! 32-bit wrap-around, and the display form shown in step logs.

use memsim_core::core::units::alu::{Alu, AluOp, AluResult};
use rstest::rstest;

/// Each operation's result for representative operands.
#[rstest]
#[case(AluOp::Add, 2, 3, 5)]
#[case(AluOp::Add, i32::MAX, 1, i32::MIN)]
#[case(AluOp::Sub, 2, 3, -1)]
#[case(AluOp::Addi, 10, -4, 6)]
#[case(AluOp::Movi, 0, 42, 42)]
#[case(AluOp::Compare, 7, 7, 1)]
#[case(AluOp::Compare, 7, 8, 0)]
#[case(AluOp::Jump, 0x1000, 0x1010, 0x1010)]
#[case(AluOp::AddressGen, 0x100, 8, 0x108)]
#[case(AluOp::AddressGen, 0, -4, -4)]
#[case(AluOp::Mem, 0, 0x40, 0x40)]
#[case(AluOp::Halt, 0, 0, 0)]
fn operation_results(#[case] op: AluOp, #[case] a: i32, #[case] b: i32, #[case] expected: i32) {
    let r = Alu::execute(op, a, b);
    assert_eq!(
        r,
        AluResult {
            op,
            operand_a: a,
            operand_b: b,
            result: expected,
        }
    );
}

/// Records render as `OP(a, b) = result`.
#[test]
fn display_format() {
    assert_eq!(Alu::execute(AluOp::Add, 2, 3).to_string(), "ADD(2, 3) = 5");
    assert_eq!(
        Alu::execute(AluOp::AddressGen, 256, 4).to_string(),
        "ADD (Addr)(256, 4) = 260"
    );
    assert_eq!(Alu::execute(AluOp::Mem, 0, 64).to_string(), "MEM(0, 64) = 64");
}
