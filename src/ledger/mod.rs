//! Folding expense records into balances.

pub mod builder;
pub mod error;
