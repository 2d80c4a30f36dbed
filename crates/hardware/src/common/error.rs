//! Simulator error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Configuration errors:** Rejected cache geometries and power parameters.
//! 2. **Program errors:** Unknown labels, unknown opcodes, and malformed lines.
//! 3. **Input errors:** Trace and program files that cannot be read.
//! 4. **Diagnostics:** The bounded-execution limit, reported alongside partial results.

use thiserror::Error;

/// Convenience alias used by every fallible simulator operation.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while configuring the simulator or parsing and running programs.
///
/// Line numbers are 1-based positions in the source text handed to the parser.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// The cache geometry or power parameters cannot be simulated.
    ///
    /// Raised before any access is performed, so no simulator state has changed.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A branch or jump references a label that was never declared.
    #[error("line {line}: unknown label `{label}`")]
    UnknownLabel {
        /// The label as written in the source.
        label: String,
        /// Source line of the offending branch.
        line: usize,
    },

    /// A trace or assembly line does not match the expected grammar.
    #[error("line {line}: malformed input `{text}`: {reason}")]
    MalformedLine {
        /// Source line number.
        line: usize,
        /// The raw (trimmed) line text.
        text: String,
        /// What the parser expected.
        reason: String,
    },

    /// The mnemonic is not part of the supported instruction set.
    #[error("line {line}: unknown opcode `{opcode}`")]
    UnknownOpcode {
        /// The mnemonic as written in the source.
        opcode: String,
        /// Source line number.
        line: usize,
    },

    /// A trace or program file could not be read.
    #[error("cannot read `{path}`: {reason}")]
    Io {
        /// Path as given by the caller.
        path: String,
        /// Description of the underlying I/O failure.
        reason: String,
    },

    /// Bounded execution stopped after `limit` steps.
    ///
    /// Never returned as an `Err`: it accompanies the partial trace or
    /// step log that was produced before the cap was reached.
    #[error("execution limit of {limit} steps exceeded (infinite loop?)")]
    ExecutionLimitExceeded {
        /// The step cap that was reached.
        limit: usize,
    },
}

impl SimError {
    /// Builds a [`SimError::MalformedLine`] from borrowed parts.
    pub fn malformed(line: usize, text: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for diagnostics that do not abort the current operation.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::ExecutionLimitExceeded { .. })
    }
}
