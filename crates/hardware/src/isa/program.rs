//! Program Assembly (label pass).
//!
//! Builds a [`Program`] from source text in a single pass: comments and blank
//! lines are dropped, labels are bound to the index of the next instruction,
//! and every instruction is decoded. Branch targets are checked once all
//! labels are known, so an unknown label is reported before anything runs.

use std::collections::BTreeMap;

use crate::common::{SimError, SimResult};
use crate::isa::decode::{decode, split_label, strip_comment};
use crate::isa::instruction::Instruction;

/// A decoded instruction and the source line it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceInstruction {
    /// 1-based source line.
    pub line: usize,
    /// The instruction.
    pub inst: Instruction,
}

/// Decoded instruction list plus its label table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<SourceInstruction>,
    labels: BTreeMap<String, usize>,
}

impl Program {
    /// Decodes `source` and resolves its labels.
    ///
    /// # Errors
    ///
    /// The first decoding error in source order, or
    /// [`SimError::UnknownLabel`] for a branch to an undeclared label.
    pub fn parse(source: &str) -> SimResult<Self> {
        let mut program = Self::default();
        for (idx, raw) in source.lines().enumerate() {
            let line = idx + 1;
            let text = strip_comment(raw);
            if text.is_empty() {
                continue;
            }
            let (label, body) = split_label(line, text)?;
            if let Some(label) = label {
                let _ = program
                    .labels
                    .insert(label.to_string(), program.instructions.len());
            }
            if !body.is_empty() {
                program.instructions.push(SourceInstruction {
                    line,
                    inst: decode(line, body)?,
                });
            }
        }

        let unknown = program.instructions.iter().find_map(|si| {
            si.inst
                .target()
                .filter(|t| !program.labels.contains_key(*t))
                .map(|t| (t, si.line))
        });
        if let Some((label, line)) = unknown {
            return Err(SimError::UnknownLabel {
                label: label.to_string(),
                line,
            });
        }

        tracing::debug!(
            instructions = program.instructions.len(),
            labels = program.labels.len(),
            "program assembled"
        );
        Ok(program)
    }

    /// Instruction at `index`.
    pub fn get(&self, index: usize) -> Option<&SourceInstruction> {
        self.instructions.get(index)
    }

    /// Instruction index a label is bound to.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// All labels, ordered by name.
    pub fn labels(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.labels.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// All instructions in program order.
    pub fn instructions(&self) -> &[SourceInstruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
