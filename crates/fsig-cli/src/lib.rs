//! fsig CLI library.
//!
//! Source scanning, profile loading, atomic manifest writing and the
//! `generate`, `check` and `profile` commands behind the `fsig` binary.

pub mod commands;
pub mod input;
pub mod output;
