//! Assembly Line Decoder.
//!
//! This module turns one line of assembly text into an [`Instruction`]. It handles:
//! 1. **Comments:** Everything after `//` or `#` is ignored.
//! 2. **Labels:** An identifier followed by `:` at the start of a line, alone or
//!    before an instruction.
//! 3. **Operands:** Comma or whitespace separated; registers `xN`, `rN` or `RN`;
//!    decimal or `0x` hex immediates; memory operands `offset(base)`.
//!
//! Mnemonics are case-insensitive. Unknown mnemonics are reported as
//! [`SimError::UnknownOpcode`], anything else that does not fit the grammar as
//! [`SimError::MalformedLine`].

use crate::common::addr::{is_identifier, parse_word};
use crate::common::{SimError, SimResult};
use crate::isa::instruction::Instruction;

/// Every accepted mnemonic, upper case.
pub const MNEMONICS: &[&str] = &["ADD", "SUB", "ADDI", "MOVI", "LW", "SW", "BEQ", "JMP", "HALT"];

/// Removes a trailing `//` or `#` comment and surrounding whitespace.
pub fn strip_comment(text: &str) -> &str {
    let end = [text.find("//"), text.find('#')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(text.len());
    text[..end].trim()
}

/// Splits a leading `label:` from the rest of a comment-free line.
///
/// # Errors
///
/// Returns [`SimError::MalformedLine`] if the text before `:` is not an identifier.
pub fn split_label(line: usize, text: &str) -> SimResult<(Option<&str>, &str)> {
    match text.split_once(':') {
        None => Ok((None, text)),
        Some((head, rest)) => {
            let head = head.trim();
            if is_identifier(head) {
                Ok((Some(head), rest.trim()))
            } else {
                Err(SimError::malformed(
                    line,
                    text,
                    "a label must be an identifier followed by `:`",
                ))
            }
        }
    }
}

/// Returns `true` if the first token of `text` is a known mnemonic.
pub fn starts_with_mnemonic(text: &str) -> bool {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .is_some_and(|m| MNEMONICS.iter().any(|k| k.eq_ignore_ascii_case(m)))
}

/// Decodes one instruction (no label, no comment).
///
/// # Arguments
///
/// * `line` - 1-based source line, used in errors
/// * `text` - The instruction text
///
/// # Errors
///
/// [`SimError::UnknownOpcode`] for an unsupported mnemonic, and
/// [`SimError::MalformedLine`] for a wrong operand count or a bad operand.
pub fn decode(line: usize, text: &str) -> SimResult<Instruction> {
    let tokens: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    let Some((&mnemonic, ops)) = tokens.split_first() else {
        return Err(SimError::malformed(line, text, "empty instruction"));
    };
    let upper = mnemonic.to_ascii_uppercase();

    let operands = |n: usize| -> SimResult<()> {
        if ops.len() == n {
            Ok(())
        } else {
            Err(SimError::malformed(
                line,
                text,
                format!("{upper} takes {n} operand(s), found {}", ops.len()),
            ))
        }
    };
    let reg = |tok: &str| {
        register(tok).ok_or_else(|| {
            SimError::malformed(line, text, format!("`{tok}` is not a register"))
        })
    };
    let imm = |tok: &str| {
        parse_word(tok).ok_or_else(|| {
            SimError::malformed(line, text, format!("`{tok}` is not an immediate"))
        })
    };
    let mem = |tok: &str| {
        memory_operand(tok).ok_or_else(|| {
            SimError::malformed(line, text, format!("`{tok}` is not of the form offset(base)"))
        })
    };
    let label = |tok: &str| {
        if is_identifier(tok) {
            Ok(tok.to_string())
        } else {
            Err(SimError::malformed(line, text, format!("`{tok}` is not a label")))
        }
    };

    let inst = match upper.as_str() {
        "ADD" | "SUB" => {
            operands(3)?;
            let (rd, rs1, rs2) = (reg(ops[0])?, reg(ops[1])?, reg(ops[2])?);
            if upper == "ADD" {
                Instruction::Add { rd, rs1, rs2 }
            } else {
                Instruction::Sub { rd, rs1, rs2 }
            }
        }
        "ADDI" => {
            operands(3)?;
            Instruction::Addi {
                rd: reg(ops[0])?,
                rs1: reg(ops[1])?,
                imm: imm(ops[2])?,
            }
        }
        "MOVI" => {
            operands(2)?;
            Instruction::Movi {
                rd: reg(ops[0])?,
                imm: imm(ops[1])?,
            }
        }
        "LW" => {
            operands(2)?;
            let (offset, base) = mem(ops[1])?;
            Instruction::Lw {
                rd: reg(ops[0])?,
                base,
                offset,
            }
        }
        "SW" => {
            operands(2)?;
            let (offset, base) = mem(ops[1])?;
            Instruction::Sw {
                rs2: reg(ops[0])?,
                base,
                offset,
            }
        }
        "BEQ" => {
            operands(3)?;
            Instruction::Beq {
                rs1: reg(ops[0])?,
                rs2: reg(ops[1])?,
                label: label(ops[2])?,
            }
        }
        "JMP" => {
            operands(1)?;
            Instruction::Jmp {
                label: label(ops[0])?,
            }
        }
        "HALT" => {
            operands(0)?;
            Instruction::Halt
        }
        _ => {
            return Err(SimError::UnknownOpcode {
                opcode: mnemonic.to_string(),
                line,
            });
        }
    };
    Ok(inst)
}

/// Parses `xN`, `rN` or `RN`.
fn register(tok: &str) -> Option<usize> {
    let digits = tok.strip_prefix(['x', 'X', 'r', 'R'])?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parses `offset(base)`; an empty offset is 0.
fn memory_operand(tok: &str) -> Option<(i32, usize)> {
    let (offset, base) = tok.strip_suffix(')')?.split_once('(')?;
    let offset = if offset.is_empty() { 0 } else { parse_word(offset)? };
    Some((offset, register(base.trim())?))
}
