//! Shared test infrastructure.
//!
//! 1. **Configs:** Builders for the small geometries used throughout the suite.
//! 2. **Harness:** [`harness::TestContext`], a simulator with access shorthands.
