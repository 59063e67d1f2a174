//! Declaration tracking for the parser.
//!
//! - `registry`: type names to type descriptors, seeded with the built-in
//!   primitive catalog and extended by `record` and `typedef` declarations
//! - `scope`: nested lexical scopes of declared variables, plus the
//!   top-level function table
//!
//! Both are owned by one parse. A caller parsing several units at once gives
//! each its own instances.

pub mod registry;
pub mod scope;

#[cfg(test)]
mod tests;
