//! Error types and error collection for the front end.
//!
//! - `Error`: a located error with a category, message and optional tip
//! - `ErrorImpl`: every message the front end can produce
//! - `Diagnostics`: the per-parse sink, in first-error or collect-all mode
//! - `suggest`: "did you mean" candidates by edit distance

pub mod diagnostics;
pub mod errors;
pub mod suggest;

#[cfg(test)]
mod tests;
