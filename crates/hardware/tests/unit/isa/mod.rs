

/// Whole-program label binding and resolution.
pub mod program;
