//! Foundational types: participants, expense records, balances and transfers.

pub mod amount;
pub mod balances;
pub mod expense;
pub mod participant;
pub mod transfer;
