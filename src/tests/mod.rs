// Test modules for journal-e2e crate
//
// Test organization follows the template pattern where each source file
// has a corresponding test file that focuses on behaviour verification.
// HTTP-level behaviour against mock services lives in the crate's tests/
// directory.

// Shared fixtures
pub mod helpers;

// Core unit tests
pub mod config;
pub mod report;
