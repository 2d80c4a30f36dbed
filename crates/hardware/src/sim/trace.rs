//! Address Trace Format.
//!
//! One memory operation per line:
//! 1. **Read:** A bare address (`0x100`, `256`) or variable name (`counter`),
//!    optionally prefixed with `Read`.
//! 2. **Write:** `Write <addr> [value]` (a missing value stores 0), or
//!    `<addr> = <value>`.
//!
//! Blank lines and `//` or `#` comments are skipped. Rendering produces the
//! canonical form: `0x<HEX>` for reads and `Write 0x<HEX> <value>` for writes.

use std::fmt;

use serde::Serialize;

use crate::common::addr::parse_word;
use crate::common::{AccessType, AddressRef, SimError, SimResult};
use crate::isa::decode::strip_comment;

/// One operation of an address trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceOp {
    /// Target address.
    #[serde(serialize_with = "serialize_display")]
    pub addr: AddressRef,
    /// Read or write.
    pub kind: AccessType,
    /// Value written; always `None` for reads.
    pub value: Option<i32>,
}

impl TraceOp {
    /// A read of `addr`.
    pub fn read(addr: impl Into<AddressRef>) -> Self {
        Self {
            addr: addr.into(),
            kind: AccessType::Read,
            value: None,
        }
    }

    /// A write of `value` to `addr`.
    pub fn write(addr: impl Into<AddressRef>, value: i32) -> Self {
        Self {
            addr: addr.into(),
            kind: AccessType::Write,
            value: Some(value),
        }
    }

    /// Parses one trace line.
    ///
    /// Returns `Ok(None)` for blank and comment-only lines.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MalformedLine`] if the line fits none of the forms.
    pub fn parse_line(line: usize, raw: &str) -> SimResult<Option<Self>> {
        let text = strip_comment(raw);
        if text.is_empty() {
            return Ok(None);
        }
        let bad = |reason: &str| SimError::malformed(line, text, reason);
        let address = |tok: &str| AddressRef::parse(tok).ok_or_else(|| bad("bad address"));
        let value = |tok: &str| parse_word(tok).ok_or_else(|| bad("bad value"));

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let op = match tokens.as_slice() {
            [kw, addr] if kw.eq_ignore_ascii_case("read") => Self::read(address(*addr)?),
            [kw, addr] if kw.eq_ignore_ascii_case("write") => Self {
                addr: address(*addr)?,
                kind: AccessType::Write,
                value: None,
            },
            [kw, addr, v] if kw.eq_ignore_ascii_case("write") => {
                Self::write(address(*addr)?, value(*v)?)
            }
            [kw, ..] if kw.eq_ignore_ascii_case("read") || kw.eq_ignore_ascii_case("write") => {
                return Err(bad("wrong number of operands"));
            }
            _ => match text.split_once('=') {
                Some((lhs, rhs)) => Self::write(address(lhs)?, value(rhs)?),
                None if tokens.len() == 1 => Self::read(address(text)?),
                None => {
                    return Err(bad(
                        "expected an address, `name = value` or `Write addr value`",
                    ));
                }
            },
        };
        Ok(Some(op))
    }

    /// Returns `true` if `text` looks like a trace line rather than an instruction.
    ///
    /// Used by the live interpreter to route raw accesses.
    pub fn looks_like_trace(text: &str) -> bool {
        let first = text.split_whitespace().next().unwrap_or("");
        text.contains('=')
            || first.starts_with("0x")
            || first.starts_with("0X")
            || first.eq_ignore_ascii_case("read")
            || first.eq_ignore_ascii_case("write")
    }
}

impl fmt::Display for TraceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AccessType::Read => write!(f, "{}", self.addr),
            AccessType::Write => write!(f, "Write {} {}", self.addr, self.value.unwrap_or(0)),
        }
    }
}

fn serialize_display<S: serde::Serializer>(addr: &AddressRef, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(addr)
}

/// Parses a whole trace, skipping blank and comment lines.
///
/// # Errors
///
/// The first malformed line, with its 1-based line number.
pub fn parse_trace(text: &str) -> SimResult<Vec<TraceOp>> {
    let mut ops = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        if let Some(op) = TraceOp::parse_line(idx + 1, raw)? {
            ops.push(op);
        }
    }
    Ok(ops)
}

/// Renders operations one per line in canonical form.
pub fn render_trace(ops: &[TraceOp]) -> String {
    ops.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
