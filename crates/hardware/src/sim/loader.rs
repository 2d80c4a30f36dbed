//! Input File Loader.
//!
//! This module reads simulator inputs from disk. It performs:
//! 1. **Text loading:** Reads a trace, program, or configuration file into memory.
//! 2. **Parsing:** Hands the text to the trace parser, the program decoder, or
//!    the configuration deserializer.
//!
//! I/O failures are reported as [`SimError::Io`] with the offending path.

use std::fs;
use std::path::Path;

use crate::common::{SimError, SimResult};
use crate::config::Config;
use crate::isa::Program;
use crate::sim::trace::{TraceOp, parse_trace};

/// Reads a whole text file.
///
/// # Arguments
///
/// * `path` - Path to the file.
///
/// # Returns
///
/// The file contents.
pub fn load_text(path: impl AsRef<Path>) -> SimResult<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| SimError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), bytes = text.len(), "loaded input file");
    Ok(text)
}

/// Reads and parses an address trace file.
pub fn load_trace_file(path: impl AsRef<Path>) -> SimResult<Vec<TraceOp>> {
    parse_trace(&load_text(path)?)
}

/// Reads and decodes an assembly program file.
pub fn load_program_file(path: impl AsRef<Path>) -> SimResult<Program> {
    Program::parse(&load_text(path)?)
}

/// Reads and validates a JSON configuration file.
pub fn load_config_file(path: impl AsRef<Path>) -> SimResult<Config> {
    Config::from_json(&load_text(path)?)
}
