//! Stable exit codes for the harness binary.

/// Every required step passed.
pub const OK: i32 = 0;
/// At least one required step failed.
pub const REQUIRED_STEP_FAILED: i32 = 1;
/// Configuration was invalid; no step ran.
pub const CONFIGURATION: i32 = 2;
