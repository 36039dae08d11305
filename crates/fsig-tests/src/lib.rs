//! fsig End-to-End Test Infrastructure
//!
//! Fixture source trees, a determinism checker and the integration tests
//! that exercise the whole pipeline: Fortran sources → manifest file.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p fsig-tests
//! ```

pub mod determinism;
pub mod fixtures;

// Re-export commonly used items
pub use determinism::{compute_hash, verify_determinism, DeterminismResult, DiffInfo};
pub use fixtures::SourceTree;
