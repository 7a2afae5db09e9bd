//! Settlement planning: turning balances into transfers.
//!
//! - **greedy**: largest debts against largest credits (default)
//! - **fair**: every participant pays at most once
//! - **search**: randomized greedy pairings scored by an [`objective::Objective`]

pub mod fair;
pub mod greedy;
pub mod objective;
pub mod planner;
pub mod search;
