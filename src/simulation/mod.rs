//! Random ledgers for testing and benchmarking.

pub mod random_ledger;
